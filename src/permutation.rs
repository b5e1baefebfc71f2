//! Null and observed EMD for one donor pair.
//!
//! ## Layout
//!
//! [`pair_emd_matrix`] produces an `(n_permutations + 1) × n_comp` matrix:
//!
//! - rows `0..n_permutations`: EMD under permuted donor labels, row `s`
//!   drawn with seed `s`
//! - last row: EMD under the true labels
//!
//! The last row is present for every `n_permutations`, including zero.
//!
//! ## Permutations
//!
//! Seed `s` seeds a ChaCha8 generator (counter-based, platform independent)
//! that shuffles the pair's membership vector. Shuffling keeps both group
//! sizes fixed, so neither donor can end up empty. Draws depend only on the
//! seed and the pair's row order, never on scheduling.

use crate::dataset::PairView;
use crate::emd::{component_emd, warn_degenerate_components};
use crate::error::Result;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Row-major `(n_permutations + 1) × n_comp` EMD values for one pair.
#[derive(Clone, Debug, PartialEq)]
pub struct EmdMatrix {
    n_permutations: usize,
    n_comp: usize,
    values: Vec<f64>,
}

impl EmdMatrix {
    fn zeros(n_permutations: usize, n_comp: usize) -> Self {
        Self {
            n_permutations,
            n_comp,
            values: vec![0.0; (n_permutations + 1) * n_comp],
        }
    }

    pub fn n_permutations(&self) -> usize {
        self.n_permutations
    }

    pub fn n_comp(&self) -> usize {
        self.n_comp
    }

    pub fn n_rows(&self) -> usize {
        self.n_permutations + 1
    }

    pub fn get(&self, row: usize, comp: usize) -> f64 {
        self.values[row * self.n_comp + comp]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.n_comp..(row + 1) * self.n_comp]
    }

    /// EMD under the true labels, one value per component.
    pub fn observed(&self) -> &[f64] {
        self.row(self.n_permutations)
    }

    /// Null draws for one component.
    pub fn null_draws(&self, comp: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.n_permutations).map(move |row| self.get(row, comp))
    }

    fn set_row(&mut self, row: usize, values: &[f64]) {
        self.values[row * self.n_comp..(row + 1) * self.n_comp].copy_from_slice(values);
    }
}

/// Shuffle `membership` deterministically with `seed`.
pub fn permuted_membership(membership: &[bool], seed: u64) -> Vec<bool> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut permuted = membership.to_vec();
    permuted.shuffle(&mut rng);
    permuted
}

/// EMD for every selected component of `view` under one assignment.
fn emd_row(view: &PairView, membership: &[bool]) -> Result<Vec<f64>> {
    (0..view.components().len())
        .map(|slot| component_emd(view, slot, membership))
        .collect()
}

/// Compute the null + observed EMD matrix for one donor pair.
pub fn pair_emd_matrix(view: &PairView, n_permutations: usize) -> Result<EmdMatrix> {
    let pair = view.pair();
    debug!(
        first = %pair.first,
        second = %pair.second,
        rows = view.n_rows(),
        n_permutations,
        "computing pair EMD"
    );

    warn_degenerate_components(view);
    let mut matrix = EmdMatrix::zeros(n_permutations, view.components().len());

    for seed in 0..n_permutations {
        let permuted = permuted_membership(view.membership(), seed as u64);
        matrix.set_row(seed, &emd_row(view, &permuted)?);
    }
    matrix.set_row(n_permutations, &emd_row(view, view.membership())?);

    debug!(first = %pair.first, second = %pair.second, "pair EMD done");
    Ok(matrix)
}
