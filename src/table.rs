//! Flat result table: one row per (donor pair, component).
//!
//! Column names are fixed for compatibility with downstream consumers:
//! `donorID_1, donorID_2, basis, component, emd, pval`. `pval` is empty when
//! distances were computed without permutation draws.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const COLUMNS: [&str; 6] = ["donorID_1", "donorID_2", "basis", "component", "emd", "pval"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmdRecord {
    #[serde(rename = "donorID_1")]
    pub donor_id_1: String,
    #[serde(rename = "donorID_2")]
    pub donor_id_2: String,
    pub basis: String,
    pub component: usize,
    pub emd: f64,
    pub pval: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmdTable {
    records: Vec<EmdRecord>,
}

impl EmdTable {
    pub fn new(records: Vec<EmdRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EmdRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EmdRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmdRecord> {
        self.records.iter()
    }

    /// Rows for a single component, in table order.
    pub fn component(&self, component: usize) -> impl Iterator<Item = &EmdRecord> {
        self.records.iter().filter(move |r| r.component == component)
    }

    /// Write as CSV. The header is always written, even for an empty table.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(COLUMNS)?;
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let records = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<EmdRecord>, _>>()?;
        Ok(Self { records })
    }

    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }

    pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_csv(BufReader::new(file))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl<'a> IntoIterator for &'a EmdTable {
    type Item = &'a EmdRecord;
    type IntoIter = std::slice::Iter<'a, EmdRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(a: &str, b: &str, component: usize, pval: Option<f64>) -> EmdRecord {
        EmdRecord {
            donor_id_1: a.to_string(),
            donor_id_2: b.to_string(),
            basis: "X_diffmap".to_string(),
            component,
            emd: 0.25,
            pval,
        }
    }

    #[test]
    fn test_csv_header_and_missing_pval() {
        let table = EmdTable::new(vec![
            record("d1", "d2", 1, Some(0.5)),
            record("d1", "d3", 1, None),
        ]);
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("donorID_1,donorID_2,basis,component,emd,pval"));
        assert_eq!(lines.next(), Some("d1,d2,X_diffmap,1,0.25,0.5"));
        assert_eq!(lines.next(), Some("d1,d3,X_diffmap,1,0.25,"));

        let parsed = EmdTable::read_csv(text.as_bytes()).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let mut buf = Vec::new();
        EmdTable::default().write_csv(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap().trim_end(),
            "donorID_1,donorID_2,basis,component,emd,pval"
        );
    }

    #[test]
    fn test_json_uses_column_names() {
        let table = EmdTable::new(vec![record("d1", "d2", 2, Some(1.0))]);
        let json = table.to_json().unwrap();
        assert!(json.contains("\"donorID_1\": \"d1\""));
        assert_eq!(EmdTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn test_component_filter() {
        let table = EmdTable::new(vec![
            record("d1", "d2", 1, None),
            record("d1", "d2", 2, None),
            record("d1", "d3", 1, None),
        ]);
        assert_eq!(table.component(1).count(), 2);
        assert_eq!(table.component(3).count(), 0);
    }
}
