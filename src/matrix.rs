//! Symmetric donor × donor distance matrix for one component.
//!
//! Pivots the flat result table for heatmap-style consumers: each row
//! `(d1, d2, emd)` fills both `[d1][d2]` and `[d2][d1]`. The diagonal and
//! pairs absent from the table are 0. With a p-value cutoff, distances whose
//! p-value exceeds it are zeroed.

use crate::error::Result;
use crate::pairs::unique_in_order;
use crate::table::EmdTable;
use std::collections::HashMap;
use std::io::Write;

#[derive(Clone, Debug, PartialEq)]
pub struct DonorMatrix {
    component: usize,
    donors: Vec<String>,
    values: Vec<f64>,
}

impl DonorMatrix {
    /// Donors are ordered by first appearance in the component's rows.
    pub fn from_table(table: &EmdTable, component: usize, pval_cut: Option<f64>) -> Self {
        let mut names = Vec::new();
        for record in table.component(component) {
            names.push(record.donor_id_1.as_str());
            names.push(record.donor_id_2.as_str());
        }
        let donors = unique_in_order(&names);
        let index: HashMap<&str, usize> = donors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.as_str(), i))
            .collect();

        let n = donors.len();
        let mut values = vec![0.0; n * n];
        for record in table.component(component) {
            let insignificant = match (pval_cut, record.pval) {
                (Some(cut), Some(p)) => p > cut,
                _ => false,
            };
            let emd = if insignificant { 0.0 } else { record.emd };
            let i = index[record.donor_id_1.as_str()];
            let j = index[record.donor_id_2.as_str()];
            if i != j {
                values[i * n + j] = emd;
                values[j * n + i] = emd;
            }
        }

        Self {
            component,
            donors,
            values,
        }
    }

    pub fn component(&self) -> usize {
        self.component
    }

    pub fn donors(&self) -> &[String] {
        &self.donors
    }

    pub fn len(&self) -> usize {
        self.donors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.donors.len() + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.donors.len();
        &self.values[i * n..(i + 1) * n]
    }

    pub fn distance(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.donors.iter().position(|d| d == a)?;
        let j = self.donors.iter().position(|d| d == b)?;
        Some(self.get(i, j))
    }

    /// Write as CSV with a leading `donorID` column and one column per donor.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec!["donorID".to_string()];
        header.extend(self.donors.iter().cloned());
        wtr.write_record(&header)?;
        for (i, donor) in self.donors.iter().enumerate() {
            let mut record = vec![donor.clone()];
            record.extend(self.row(i).iter().map(|v| v.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
