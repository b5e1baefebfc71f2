//! # donor_emd: Pairwise Donor EMD with Permutation Tests
//!
//! Computes, for every pair of donors in a labelled observation set and for
//! each selected embedding component, the 1-D Earth Mover's Distance
//! (Wasserstein-1) between the two donors' coordinate distributions, plus an
//! empirical p-value from a label-permutation test.
//!
//! ## Pipeline
//!
//! 1. **Pair enumeration** ([`pairs`]): all 2-combinations of the distinct
//!    donor labels, in order of first appearance.
//!
//! 2. **Pair engine** ([`permutation`]): project the pair's rows out of the
//!    dataset ([`ObservationSet::restrict`]), then fill an
//!    `(n_permutations + 1) × n_comp` matrix:
//!    - row `s < n_permutations`: EMD after shuffling the pair's donor labels
//!      with seed `s`
//!    - last row: EMD under the true labels
//!
//! 3. **Aggregation** ([`aggregate`]): run the engine for every pair on a
//!    scoped worker pool, derive
//!    `p = #{null > observed} / n_permutations` per (pair, component), and
//!    build the flat [`EmdTable`].
//!
//! ## 1-D EMD
//!
//! For one-dimensional samples the optimal transport cost is the area
//! between the empirical CDFs, computed exactly after sorting:
//! O(m log m) for m observations in the pair ([`emd_1d`]).
//!
//! ## Component selection
//!
//! - `X_diffmap`: component 0 is the trivial eigenvector and is skipped;
//!   components `1..=n_comp` are analysed and reported with those indices.
//!   Evaluating component 0 anyway logs a warning.
//! - any other basis: components `0..n_comp`.
//!
//! ## Example
//!
//! ```no_run
//! use donor_emd::{emd_pval, io, EmdConfig};
//!
//! let data = io::read_observations_path("cells.csv", "donorID", "X_diffmap")?;
//! let config = EmdConfig::default().with_n_comp(3).with_n_permutations(200);
//! let table = emd_pval(&data, &config)?;
//! table.write_csv(std::io::stdout())?;
//! # Ok::<(), donor_emd::EmdError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod emd;
pub mod emd_1d;
pub mod error;
pub mod io;
pub mod matrix;
pub mod pairs;
pub mod permutation;
pub mod table;


pub use aggregate::{emd_pval, empirical_pvalue, pairwise_emd};
pub use config::EmdConfig;
pub use dataset::{Embedding, ObservationSet, PairView};
pub use emd::{component_emd, donor_pair_component_emd, ComponentSelection};
pub use emd_1d::wasserstein_1d;
pub use error::{EmdError, Result};
pub use matrix::DonorMatrix;
pub use pairs::{donor_pairs, DonorPair};
pub use permutation::{pair_emd_matrix, permuted_membership, EmdMatrix};
pub use table::{EmdRecord, EmdTable};
