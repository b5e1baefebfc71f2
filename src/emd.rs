//! Per-component Earth Mover's Distance between two donors.
//!
//! A [`ComponentSelection`] decides which embedding columns are analysed.
//! Diffusion maps carry a trivial first eigenvector, so for `X_diffmap`
//! component 0 is skipped and components `1..=n_comp` are used; any other
//! basis uses `0..n_comp`. The reported component number is always the
//! embedding index itself.

use crate::config::{EmdConfig, DIFFMAP_BASIS};
use crate::dataset::{ObservationSet, PairView};
use crate::emd_1d::wasserstein_1d;
use crate::error::{EmdError, Result};
use crate::pairs::DonorPair;
use tracing::warn;

/// Embedding name plus the number of components to analyse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentSelection {
    basis: String,
    n_comp: usize,
}

impl ComponentSelection {
    pub fn new(basis: impl Into<String>, n_comp: usize) -> Self {
        Self {
            basis: basis.into(),
            n_comp,
        }
    }

    pub fn from_config(config: &EmdConfig) -> Self {
        Self::new(config.basis.clone(), config.n_comp)
    }

    pub fn basis(&self) -> &str {
        &self.basis
    }

    pub fn n_comp(&self) -> usize {
        self.n_comp
    }

    pub fn is_diffmap(&self) -> bool {
        self.basis == DIFFMAP_BASIS
    }

    /// Embedding indices analysed, in output order.
    pub fn indices(&self) -> Vec<usize> {
        let offset = usize::from(self.is_diffmap());
        (offset..offset + self.n_comp).collect()
    }

    /// Check the selection against the embedding stored in `data`.
    pub fn validate(&self, data: &ObservationSet) -> Result<()> {
        let available = data.embedding(&self.basis)?.n_dims();
        let required = self.n_comp + usize::from(self.is_diffmap());
        if self.n_comp == 0 || required > available {
            return Err(EmdError::InvalidComponents {
                requested: required,
                available,
            });
        }
        Ok(())
    }
}

/// Log the diffusion-map advisory once if `view` includes component 0.
/// The computation itself proceeds.
pub fn warn_degenerate_components(view: &PairView) {
    if view.basis() == DIFFMAP_BASIS && view.components().contains(&0) {
        warn!(
            basis = view.basis(),
            first = %view.pair().first,
            second = %view.pair().second,
            "diffusion component 0 is not meaningful and should be ignored"
        );
    }
}

/// EMD between the two donors of `view` for column `slot`, under the given
/// membership assignment (real or permuted). Views are finite by
/// construction, see [`ObservationSet::restrict`].
pub fn component_emd(view: &PairView, slot: usize, membership: &[bool]) -> Result<f64> {
    let (first, second) = view.split(slot, membership);
    let pair = view.pair();

    let emd = wasserstein_1d(&first, &second).ok_or_else(|| EmdError::EmptyGroup {
        donor: if first.is_empty() {
            pair.first.clone()
        } else {
            pair.second.clone()
        },
    })?;
    Ok(emd)
}

/// EMD between two donors of `data` for a single embedding index, using the
/// true labels.
pub fn donor_pair_component_emd(
    data: &ObservationSet,
    label_column: &str,
    pair: &DonorPair,
    component: usize,
    basis: &str,
) -> Result<f64> {
    let view = data.restrict(label_column, basis, pair, &[component])?;
    warn_degenerate_components(&view);
    component_emd(&view, 0, view.membership())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Embedding;
    use crate::test_log::capture_warnings;

    fn shifted_set(basis: &str, shift: f64) -> ObservationSet {
        let mut labels = Vec::new();
        let mut rows = Vec::new();
        for donor in ["d1", "d2"] {
            let offset = if donor == "d2" { shift } else { 0.0 };
            for i in 0..10 {
                labels.push(donor.to_string());
                let x = i as f64 * 0.1;
                rows.push(vec![x + offset, 2.0 * x + offset, 3.0 * x + offset]);
            }
        }
        ObservationSet::new(rows.len())
            .with_labels("donorID", labels)
            .unwrap()
            .with_embedding(basis, Embedding::from_rows(&rows).unwrap())
            .unwrap()
    }

    #[test]
    fn test_selection_indices() {
        assert_eq!(ComponentSelection::new("X_diffmap", 3).indices(), vec![1, 2, 3]);
        assert_eq!(ComponentSelection::new("X_pca", 3).indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_selection_validate() {
        let data = shifted_set("X_diffmap", 0.0);
        assert!(ComponentSelection::new("X_diffmap", 2).validate(&data).is_ok());
        assert!(matches!(
            ComponentSelection::new("X_diffmap", 3).validate(&data),
            Err(EmdError::InvalidComponents {
                requested: 4,
                available: 3
            })
        ));
        assert!(ComponentSelection::new("X_diffmap", 0).validate(&data).is_err());
        assert!(matches!(
            ComponentSelection::new("X_pca", 1).validate(&data),
            Err(EmdError::BasisNotFound(_))
        ));
    }

    #[test]
    fn test_shift_shows_up_in_emd() {
        let data = shifted_set("X_pca", 2.0);
        let pair = DonorPair::new("d1", "d2");
        for component in 0..3 {
            let emd =
                donor_pair_component_emd(&data, "donorID", &pair, component, "X_pca").unwrap();
            assert!((emd - 2.0).abs() < 1e-9, "component {component}: {emd}");
        }
    }

    #[test]
    fn test_diffmap_component_zero_still_computes() {
        let data = shifted_set("X_diffmap", 1.0);
        let pair = DonorPair::new("d1", "d2");
        let (emd, log) = capture_warnings(|| {
            donor_pair_component_emd(&data, "donorID", &pair, 0, "X_diffmap").unwrap()
        });
        assert!((emd - 1.0).abs() < 1e-9);
        assert_eq!(log.matches("diffusion component 0 is not meaningful").count(), 1);
        assert!(log.contains("WARN"));
    }

    #[test]
    fn test_regular_components_do_not_warn() {
        let data = shifted_set("X_diffmap", 1.0);
        let pair = DonorPair::new("d1", "d2");
        let (_, log) = capture_warnings(|| {
            donor_pair_component_emd(&data, "donorID", &pair, 1, "X_diffmap").unwrap()
        });
        assert!(log.is_empty(), "unexpected log output: {log}");

        let data = shifted_set("X_pca", 1.0);
        let (_, log) =
            capture_warnings(|| donor_pair_component_emd(&data, "donorID", &pair, 0, "X_pca"));
        assert!(log.is_empty(), "unexpected log output: {log}");
    }

    #[test]
    fn test_missing_donor_is_empty_group() {
        let data = shifted_set("X_pca", 0.0);
        let pair = DonorPair::new("d1", "ghost");
        let err = donor_pair_component_emd(&data, "donorID", &pair, 0, "X_pca").unwrap_err();
        assert!(matches!(err, EmdError::EmptyGroup { donor } if donor == "ghost"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let rows = vec![vec![0.0], vec![f64::NAN]];
        let data = ObservationSet::new(2)
            .with_labels("donorID", vec!["a".into(), "b".into()])
            .unwrap()
            .with_embedding("X_pca", Embedding::from_rows(&rows).unwrap())
            .unwrap();
        let pair = DonorPair::new("a", "b");
        let err = donor_pair_component_emd(&data, "donorID", &pair, 0, "X_pca").unwrap_err();
        assert!(matches!(
            err,
            EmdError::NonFiniteValue { donor, component: 0 } if donor == "b"
        ));
    }
}
