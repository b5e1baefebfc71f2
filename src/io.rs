//! CSV input for observation sets.
//!
//! Layout: one row per observation, a donor label column, and the embedding
//! spread over columns `<basis>_0, <basis>_1, ...`. Other columns are
//! ignored.

use crate::dataset::{Embedding, ObservationSet};
use crate::error::{EmdError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Read observations from CSV, keeping `label_column` and the `basis`
/// embedding columns.
pub fn read_observations<R: Read>(
    reader: R,
    label_column: &str,
    basis: &str,
) -> Result<ObservationSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let label_idx = headers
        .iter()
        .position(|h| h == label_column)
        .ok_or_else(|| EmdError::ColumnNotFound(label_column.to_string()))?;
    let embedding_cols = embedding_columns(headers.iter(), basis)?;

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        labels.push(record.get(label_idx).unwrap_or_default().to_string());
        for &col in &embedding_cols {
            let field = record.get(col).unwrap_or_default().trim();
            let value = field.parse::<f64>().map_err(|_| {
                EmdError::InvalidInput(format!(
                    "row {}: cannot parse {:?} in column {}",
                    line + 1,
                    field,
                    &headers[col]
                ))
            })?;
            values.push(value);
        }
    }

    debug!(
        n_obs = labels.len(),
        n_dims = embedding_cols.len(),
        basis,
        "read observations"
    );

    let n_obs = labels.len();
    let embedding = Embedding::new(n_obs, embedding_cols.len(), values)?;
    ObservationSet::new(n_obs)
        .with_labels(label_column, labels)?
        .with_embedding(basis, embedding)
}

pub fn read_observations_path(
    path: impl AsRef<Path>,
    label_column: &str,
    basis: &str,
) -> Result<ObservationSet> {
    let file = File::open(path)?;
    read_observations(BufReader::new(file), label_column, basis)
}

/// Column positions of `<basis>_<k>` for k = 0, 1, ... in order of k.
fn embedding_columns<'a>(
    headers: impl Iterator<Item = &'a str>,
    basis: &str,
) -> Result<Vec<usize>> {
    let prefix = format!("{basis}_");
    let mut found: Vec<(usize, usize)> = headers
        .enumerate()
        .filter_map(|(pos, h)| {
            let k = h.strip_prefix(&prefix)?.parse::<usize>().ok()?;
            Some((k, pos))
        })
        .collect();
    if found.is_empty() {
        return Err(EmdError::BasisNotFound(basis.to_string()));
    }
    found.sort_unstable();

    for (expected, &(k, _)) in found.iter().enumerate() {
        if k != expected {
            return Err(EmdError::InvalidInput(format!(
                "embedding {basis} is missing column {prefix}{expected}"
            )));
        }
    }
    Ok(found.into_iter().map(|(_, pos)| pos).collect())
}
