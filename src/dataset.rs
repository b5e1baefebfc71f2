//! Observation sets and per-pair projections.
//!
//! An [`ObservationSet`] holds N observations with any number of categorical
//! label columns and named coordinate embeddings (N × D, row-major).
//!
//! The pair engine never works on the full set. [`ObservationSet::restrict`]
//! copies out a [`PairView`]: the rows of two donors, their membership
//! vector, and only the selected embedding columns. The view owns its data,
//! so its cost is proportional to the pair, not to the dataset.

use crate::error::{EmdError, Result};
use crate::pairs::{donor_pairs, DonorPair};
use std::collections::HashMap;

/// Dense row-major coordinate matrix, one row per observation.
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding {
    n_obs: usize,
    n_dims: usize,
    values: Vec<f64>,
}

impl Embedding {
    pub fn new(n_obs: usize, n_dims: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != n_obs * n_dims {
            return Err(EmdError::ShapeMismatch {
                expected: n_obs * n_dims,
                actual: values.len(),
            });
        }
        Ok(Self {
            n_obs,
            n_dims,
            values,
        })
    }

    /// Build from per-observation rows; every row must have the same width.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_dims = rows.first().map(Vec::len).unwrap_or(0);
        let mut values = Vec::with_capacity(rows.len() * n_dims);
        for row in rows {
            if row.len() != n_dims {
                return Err(EmdError::ShapeMismatch {
                    expected: n_dims,
                    actual: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Self::new(rows.len(), n_dims, values)
    }

    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    pub fn n_dims(&self) -> usize {
        self.n_dims
    }

    pub fn row(&self, obs: usize) -> &[f64] {
        &self.values[obs * self.n_dims..(obs + 1) * self.n_dims]
    }

    pub fn value(&self, obs: usize, dim: usize) -> f64 {
        self.values[obs * self.n_dims + dim]
    }
}

/// Labelled observations with named embeddings.
#[derive(Clone, Debug, Default)]
pub struct ObservationSet {
    n_obs: usize,
    labels: HashMap<String, Vec<String>>,
    embeddings: HashMap<String, Embedding>,
}

impl ObservationSet {
    pub fn new(n_obs: usize) -> Self {
        Self {
            n_obs,
            labels: HashMap::new(),
            embeddings: HashMap::new(),
        }
    }

    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    pub fn insert_labels(&mut self, name: impl Into<String>, labels: Vec<String>) -> Result<()> {
        if labels.len() != self.n_obs {
            return Err(EmdError::ShapeMismatch {
                expected: self.n_obs,
                actual: labels.len(),
            });
        }
        self.labels.insert(name.into(), labels);
        Ok(())
    }

    pub fn insert_embedding(
        &mut self,
        name: impl Into<String>,
        embedding: Embedding,
    ) -> Result<()> {
        if embedding.n_obs() != self.n_obs {
            return Err(EmdError::ShapeMismatch {
                expected: self.n_obs,
                actual: embedding.n_obs(),
            });
        }
        self.embeddings.insert(name.into(), embedding);
        Ok(())
    }

    pub fn with_labels(mut self, name: impl Into<String>, labels: Vec<String>) -> Result<Self> {
        self.insert_labels(name, labels)?;
        Ok(self)
    }

    pub fn with_embedding(mut self, name: impl Into<String>, embedding: Embedding) -> Result<Self> {
        self.insert_embedding(name, embedding)?;
        Ok(self)
    }

    pub fn labels(&self, name: &str) -> Result<&[String]> {
        self.labels
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| EmdError::ColumnNotFound(name.to_string()))
    }

    pub fn embedding(&self, name: &str) -> Result<&Embedding> {
        self.embeddings
            .get(name)
            .ok_or_else(|| EmdError::BasisNotFound(name.to_string()))
    }

    pub fn donor_pairs(&self, label_column: &str) -> Result<Vec<DonorPair>> {
        Ok(donor_pairs(self.labels(label_column)?))
    }

    /// Copy out the rows of `pair` with only the `components` columns of
    /// `basis`. The dataset itself is left untouched.
    ///
    /// Fails with `NonFiniteValue` naming the donor that owns the offending
    /// row, so a view is always finite.
    pub fn restrict(
        &self,
        label_column: &str,
        basis: &str,
        pair: &DonorPair,
        components: &[usize],
    ) -> Result<PairView> {
        let labels = self.labels(label_column)?;
        let embedding = self.embedding(basis)?;
        if let Some(&max) = components.iter().max() {
            if max >= embedding.n_dims() {
                return Err(EmdError::InvalidComponents {
                    requested: max + 1,
                    available: embedding.n_dims(),
                });
            }
        }

        let rows: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| pair.contains(label))
            .map(|(obs, _)| obs)
            .collect();

        let membership = rows.iter().map(|&obs| labels[obs] == pair.first).collect();
        let mut columns = Vec::with_capacity(components.len());
        for &dim in components {
            let mut column = Vec::with_capacity(rows.len());
            for &obs in &rows {
                let value = embedding.value(obs, dim);
                if !value.is_finite() {
                    return Err(EmdError::NonFiniteValue {
                        donor: labels[obs].clone(),
                        component: dim,
                    });
                }
                column.push(value);
            }
            columns.push(column);
        }

        Ok(PairView {
            pair: pair.clone(),
            basis: basis.to_string(),
            components: components.to_vec(),
            membership,
            columns,
        })
    }
}

/// Owned projection of one donor pair: membership per row (`true` for the
/// pair's first donor) plus one column per selected component.
#[derive(Clone, Debug, PartialEq)]
pub struct PairView {
    pair: DonorPair,
    basis: String,
    components: Vec<usize>,
    membership: Vec<bool>,
    columns: Vec<Vec<f64>>,
}

impl PairView {
    pub fn pair(&self) -> &DonorPair {
        &self.pair
    }

    pub fn basis(&self) -> &str {
        &self.basis
    }

    /// Embedding indices of the selected components, in column order.
    pub fn components(&self) -> &[usize] {
        &self.components
    }

    pub fn membership(&self) -> &[bool] {
        &self.membership
    }

    pub fn n_rows(&self) -> usize {
        self.membership.len()
    }

    pub fn column(&self, slot: usize) -> &[f64] {
        &self.columns[slot]
    }

    /// Split column `slot` into (first donor, second donor) samples under
    /// the given membership assignment.
    pub fn split(&self, slot: usize, membership: &[bool]) -> (Vec<f64>, Vec<f64>) {
        let mut first = Vec::new();
        let mut second = Vec::new();
        for (&value, &is_first) in self.columns[slot].iter().zip(membership) {
            if is_first {
                first.push(value);
            } else {
                second.push(value);
            }
        }
        (first, second)
    }
}
