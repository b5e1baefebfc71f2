//! Drive the pair engine over all donor pairs and assemble the result table.
//!
//! ## Parallelism
//!
//! Each call builds its own rayon pool of `n_workers` threads and drops it on
//! return. Every pair is a separate task (`with_max_len(1)`) that projects
//! its own [`PairView`](crate::dataset::PairView) from the shared, read-only
//! dataset, so peak memory grows with the pairs in flight rather than with
//! the number of pairs. Results come back in submission order. The first
//! failing pair aborts the run.
//!
//! ## Row order
//!
//! Rows are grouped by component (ascending), then by pair in enumeration
//! order:
//!
//! ```text
//! (p0, c1) (p1, c1) ... (pK, c1) (p0, c2) (p1, c2) ...
//! ```
//!
//! ## p-values
//!
//! `p = #{null draws strictly greater than observed} / n_permutations`.
//! Ties are not counted. Identical donors still get p = 1 because every
//! shuffled split of the pooled rows has EMD > 0 while the observed one is 0.

use crate::config::EmdConfig;
use crate::dataset::ObservationSet;
use crate::emd::ComponentSelection;
use crate::error::{EmdError, Result};
use crate::pairs::DonorPair;
use crate::permutation::{pair_emd_matrix, EmdMatrix};
use crate::table::{EmdRecord, EmdTable};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::info;

/// One-sided empirical p-value of `observed` against `null` draws.
pub fn empirical_pvalue<I>(null: I, observed: f64) -> Result<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut n_draws = 0usize;
    let mut n_greater = 0usize;
    for value in null {
        n_draws += 1;
        if value > observed {
            n_greater += 1;
        }
    }
    if n_draws == 0 {
        return Err(EmdError::DegenerateStatistic);
    }
    Ok(n_greater as f64 / n_draws as f64)
}

/// Per-component p-values for one pair's EMD matrix.
pub fn matrix_pvalues(matrix: &EmdMatrix) -> Result<Vec<f64>> {
    (0..matrix.n_comp())
        .map(|comp| empirical_pvalue(matrix.null_draws(comp), matrix.observed()[comp]))
        .collect()
}

/// Pairwise EMD with permutation-test p-values for every donor pair and
/// selected component.
///
/// Fails with [`EmdError::DegenerateStatistic`] when
/// `config.n_permutations == 0`; use [`pairwise_emd`] for distances alone.
pub fn emd_pval(data: &ObservationSet, config: &EmdConfig) -> Result<EmdTable> {
    if config.n_permutations == 0 {
        return Err(EmdError::DegenerateStatistic);
    }
    run(data, config, config.n_permutations)
}

/// Pairwise EMD under the true labels only. Every `pval` is `None`.
pub fn pairwise_emd(data: &ObservationSet, config: &EmdConfig) -> Result<EmdTable> {
    run(data, config, 0)
}

fn run(data: &ObservationSet, config: &EmdConfig, n_permutations: usize) -> Result<EmdTable> {
    config.validate()?;
    let selection = ComponentSelection::from_config(config);
    selection.validate(data)?;
    let pairs = data.donor_pairs(&config.obs_donor_id)?;

    info!(
        pairs = pairs.len(),
        basis = selection.basis(),
        n_comp = selection.n_comp(),
        n_permutations,
        n_workers = config.n_workers,
        "starting pairwise EMD"
    );

    let matrices = if pairs.is_empty() {
        Vec::new()
    } else {
        let pool = build_pool(config.n_workers)?;
        compute_matrices(&pool, data, config, &selection, &pairs, n_permutations)?
    };

    let table = assemble(&pairs, &matrices, &selection, n_permutations > 0)?;
    info!(rows = table.len(), "pairwise EMD finished");
    Ok(table)
}

fn build_pool(n_workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(n_workers)
        .thread_name(|i| format!("donor-emd-{i}"))
        .build()
        .map_err(|e| EmdError::WorkerPool(e.to_string()))
}

fn compute_matrices(
    pool: &ThreadPool,
    data: &ObservationSet,
    config: &EmdConfig,
    selection: &ComponentSelection,
    pairs: &[DonorPair],
    n_permutations: usize,
) -> Result<Vec<EmdMatrix>> {
    let components = selection.indices();
    pool.install(|| {
        pairs
            .par_iter()
            .with_max_len(1)
            .map(|pair| {
                let view =
                    data.restrict(&config.obs_donor_id, selection.basis(), pair, &components)?;
                pair_emd_matrix(&view, n_permutations)
            })
            .collect()
    })
}

fn assemble(
    pairs: &[DonorPair],
    matrices: &[EmdMatrix],
    selection: &ComponentSelection,
    with_pvalues: bool,
) -> Result<EmdTable> {
    let pvalues = if with_pvalues {
        matrices
            .iter()
            .map(|m| matrix_pvalues(m).map(Some))
            .collect::<Result<Vec<_>>>()?
    } else {
        vec![None; matrices.len()]
    };

    let mut records = Vec::with_capacity(pairs.len() * selection.n_comp());
    for (slot, &component) in selection.indices().iter().enumerate() {
        for ((pair, matrix), pvals) in pairs.iter().zip(matrices).zip(&pvalues) {
            records.push(EmdRecord {
                donor_id_1: pair.first.clone(),
                donor_id_2: pair.second.clone(),
                basis: selection.basis().to_string(),
                component,
                emd: matrix.observed()[slot],
                pval: pvals.as_ref().map(|p| p[slot]),
            });
        }
    }
    Ok(EmdTable::new(records))
}
