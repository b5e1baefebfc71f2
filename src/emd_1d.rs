//! Exact 1-D Earth Mover's Distance between two empirical samples.
//!
//! For one-dimensional distributions the optimal transport cost has a closed
//! form: the area between the two empirical CDFs,
//!
//! ```text
//! W_1(U, V) = ∫ |F_U(x) - F_V(x)| dx
//! ```
//!
//! Both CDFs are step functions that only change at sample values, so the
//! integral is a finite sum over the merged, sorted sample values:
//!
//! ```text
//! W_1 = Σ_k |F_U(x_k) - F_V(x_k)| · (x_{k+1} - x_k)
//! ```
//!
//! Sorting dominates, giving O(m log m) for m = |U| + |V|. Each observation
//! carries mass 1/|U| (resp. 1/|V|), so samples of different sizes compare
//! naturally.

use ordered_float::OrderedFloat;

/// Compute the exact Wasserstein-1 distance between samples `u` and `v`.
///
/// Returns `None` when either sample is empty. Callers are expected to have
/// rejected non-finite values beforehand.
pub fn wasserstein_1d(u: &[f64], v: &[f64]) -> Option<f64> {
    if u.is_empty() || v.is_empty() {
        return None;
    }

    let mut u_sorted = u.to_vec();
    let mut v_sorted = v.to_vec();
    u_sorted.sort_unstable_by_key(|&x| OrderedFloat(x));
    v_sorted.sort_unstable_by_key(|&x| OrderedFloat(x));

    Some(wasserstein_1d_sorted(&u_sorted, &v_sorted))
}

/// Same as [`wasserstein_1d`] for samples that are already sorted ascending
/// and non-empty.
pub fn wasserstein_1d_sorted(u: &[f64], v: &[f64]) -> f64 {
    let n_u = u.len() as f64;
    let n_v = v.len() as f64;

    // i, j = number of samples <= the current breakpoint
    let mut i = 0;
    let mut j = 0;
    let mut prev = u[0].min(v[0]);
    let mut emd = 0.0;

    while i < u.len() || j < v.len() {
        let x = match (u.get(i), v.get(j)) {
            (Some(&a), Some(&b)) => a.min(b),
            (Some(&a), None) => a,
            (None, Some(&b)) => b,
            (None, None) => break,
        };

        let cdf_u = i as f64 / n_u;
        let cdf_v = j as f64 / n_v;
        emd += (cdf_u - cdf_v).abs() * (x - prev);

        while i < u.len() && u[i] <= x {
            i += 1;
        }
        while j < v.len() && v[j] <= x {
            j += 1;
        }
        prev = x;
    }

    emd
}
