//! Run configuration for the pairwise EMD permutation test.
//!
//! Defaults mirror the conventional single-cell layout: donors labelled in a
//! `donorID` column and a diffusion map stored under `X_diffmap`.

use crate::error::{EmdError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Embedding name whose component 0 is degenerate and skipped.
pub const DIFFMAP_BASIS: &str = "X_diffmap";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmdConfig {
    #[serde(default = "EmdConfig::default_obs_donor_id")]
    pub obs_donor_id: String,
    #[serde(default = "EmdConfig::default_basis")]
    pub basis: String,
    #[serde(default = "EmdConfig::default_n_comp")]
    pub n_comp: usize,
    #[serde(default = "EmdConfig::default_n_permutations")]
    pub n_permutations: usize,
    /// Worker pool width; 0 lets rayon pick one thread per core.
    #[serde(default = "EmdConfig::default_n_workers")]
    pub n_workers: usize,
}

impl EmdConfig {
    fn default_obs_donor_id() -> String {
        "donorID".to_string()
    }
    fn default_basis() -> String {
        DIFFMAP_BASIS.to_string()
    }
    fn default_n_comp() -> usize {
        5
    }
    fn default_n_permutations() -> usize {
        1000
    }
    fn default_n_workers() -> usize {
        4
    }

    pub fn with_obs_donor_id(mut self, column: impl Into<String>) -> Self {
        self.obs_donor_id = column.into();
        self
    }

    pub fn with_basis(mut self, basis: impl Into<String>) -> Self {
        self.basis = basis.into();
        self
    }

    pub fn with_n_comp(mut self, n_comp: usize) -> Self {
        self.n_comp = n_comp;
        self
    }

    pub fn with_n_permutations(mut self, n_permutations: usize) -> Self {
        self.n_permutations = n_permutations;
        self
    }

    pub fn with_n_workers(mut self, n_workers: usize) -> Self {
        self.n_workers = n_workers;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a TOML config file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_comp == 0 {
            return Err(EmdError::InvalidInput(
                "n_comp must be at least 1".to_string(),
            ));
        }
        if self.obs_donor_id.is_empty() {
            return Err(EmdError::InvalidInput(
                "donor label column name is empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EmdConfig {
    fn default() -> Self {
        Self {
            obs_donor_id: Self::default_obs_donor_id(),
            basis: Self::default_basis(),
            n_comp: Self::default_n_comp(),
            n_permutations: Self::default_n_permutations(),
            n_workers: Self::default_n_workers(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EmdConfig::default();
        assert_eq!(cfg.obs_donor_id, "donorID");
        assert_eq!(cfg.basis, "X_diffmap");
        assert_eq!(cfg.n_comp, 5);
        assert_eq!(cfg.n_permutations, 1000);
        assert_eq!(cfg.n_workers, 4);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg = EmdConfig::from_toml_str("n_comp = 2\nbasis = \"X_pca\"\n").unwrap();
        assert_eq!(cfg.n_comp, 2);
        assert_eq!(cfg.basis, "X_pca");
        assert_eq!(cfg.n_permutations, 1000);
    }

    #[test]
    fn test_negative_permutations_rejected() {
        let err = EmdConfig::from_toml_str("n_permutations = -3\n").unwrap_err();
        assert!(matches!(err, EmdError::Toml(_)));
    }

    #[test]
    fn test_zero_components_rejected() {
        let err = EmdConfig::from_toml_str("n_comp = 0\n").unwrap_err();
        assert!(matches!(err, EmdError::InvalidInput(msg) if msg == "n_comp must be at least 1"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let custom = EmdConfig::default().with_n_workers(1).with_n_permutations(10);
        let text = toml::to_string_pretty(&custom).unwrap();
        let parsed = EmdConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, custom);
    }
}
