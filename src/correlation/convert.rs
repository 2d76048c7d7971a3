//! correlation::convert — closed-form maps between Pearson, Spearman and
//! Kendall coefficients under a Gaussian copula.
//!
//! Purpose
//! -------
//! For a bivariate normal with Pearson correlation `ρ`,
//!
//! - Spearman's `ρ_S = (6/π)·asin(ρ/2)`, so `ρ = 2·sin(π·ρ_S/6)`;
//! - Kendall's `τ = (2/π)·asin(ρ)`, so `ρ = sin(π·τ/2)`.
//!
//! Rank correlations are copula invariants, so a Spearman or Kendall target
//! for arbitrary continuous marginals maps to the latent normal correlation
//! directly with these formulas.
//!
//! Conventions
//! -----------
//! - Conversions route through Pearson; Spearman ↔ Kendall is a composition.
//! - Results are clamped into `[−1, 1]` against round-off.
use crate::correlation::errors::{CorrelationError, CorrelationResult};
use ndarray::Array2;
use std::f64::consts::PI;
use std::str::FromStr;

/// Correlation coefficient family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationType {
    #[default]
    Pearson,
    Spearman,
    Kendall,
}

impl FromStr for CorrelationType {
    type Err = CorrelationError;

    /// Parse `"pearson"`, `"spearman"` or `"kendall"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pearson" => Ok(CorrelationType::Pearson),
            "spearman" => Ok(CorrelationType::Spearman),
            "kendall" => Ok(CorrelationType::Kendall),
            _ => Err(CorrelationError::InvalidType { name: s.to_string() }),
        }
    }
}

/// cor_convert — convert one coefficient between correlation types.
///
/// Parameters
/// ----------
/// - `rho`: `f64`
///   Coefficient of type `from`, in `[−1, 1]`.
/// - `from`, `to`: `CorrelationType`
///
/// Returns
/// -------
/// `CorrelationResult<f64>`
///   The Gaussian-copula equivalent of type `to`.
///
/// Errors
/// ------
/// - `OutOfRange` for non-finite `rho` or `|rho| > 1`.
///
/// Examples
/// --------
/// ```rust
/// use rust_mvsim::correlation::{CorrelationType, cor_convert};
///
/// let tau = cor_convert(0.5, CorrelationType::Pearson, CorrelationType::Kendall).unwrap();
/// assert!((tau - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn cor_convert(rho: f64, from: CorrelationType, to: CorrelationType) -> CorrelationResult<f64> {
    if !rho.is_finite() || rho.abs() > 1.0 {
        return Err(CorrelationError::OutOfRange { value: rho });
    }
    if from == to {
        return Ok(rho);
    }
    let pearson = match from {
        CorrelationType::Pearson => rho,
        CorrelationType::Spearman => 2.0 * (PI * rho / 6.0).sin(),
        CorrelationType::Kendall => (PI * rho / 2.0).sin(),
    };
    let out = match to {
        CorrelationType::Pearson => pearson,
        CorrelationType::Spearman => 6.0 / PI * (pearson / 2.0).asin(),
        CorrelationType::Kendall => 2.0 / PI * pearson.clamp(-1.0, 1.0).asin(),
    };
    Ok(out.clamp(-1.0, 1.0))
}

/// Apply [`cor_convert`] to every off-diagonal entry; the diagonal is set to 1.
///
/// # Errors
/// - `NotSquare` for non-square input.
/// - `OutOfRange` for the first invalid off-diagonal entry.
pub fn cor_convert_matrix(
    m: &Array2<f64>, from: CorrelationType, to: CorrelationType,
) -> CorrelationResult<Array2<f64>> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(CorrelationError::NotSquare { rows, cols });
    }
    let mut out = Array2::<f64>::eye(rows);
    for ((i, j), &v) in m.indexed_iter() {
        if i != j {
            out[[i, j]] = cor_convert(v, from, to)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Known values and round trips of the closed forms.
    // - Parsing of `CorrelationType`.
    // - Matrix application and range validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the closed forms on textbook values.
    //
    // Given
    // -----
    // - ρ = 0.5 (Kendall 1/3), ρ = 1 (all types 1), ρ_S = 0.5.
    //
    // Expect
    // ------
    // - τ = 1/3; endpoints fixed; Spearman → Pearson = 2 sin(π/12).
    fn closed_forms_match_known_values() {
        use CorrelationType::*;
        assert!((cor_convert(0.5, Pearson, Kendall).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((cor_convert(1.0, Pearson, Spearman).unwrap() - 1.0).abs() < 1e-12);
        assert!((cor_convert(-1.0, Kendall, Pearson).unwrap() + 1.0).abs() < 1e-12);
        let expected = 2.0 * (PI / 12.0).sin();
        assert!((cor_convert(0.5, Spearman, Pearson).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Conversions invert each other, including Spearman ↔ Kendall.
    //
    // Given
    // -----
    // - ρ ∈ {−0.9, −0.3, 0, 0.4, 0.8}, every ordered type pair.
    //
    // Expect
    // ------
    // - from → to → from returns ρ within 1e-12.
    fn conversions_round_trip() {
        use CorrelationType::*;
        for rho in [-0.9, -0.3, 0.0, 0.4, 0.8] {
            for from in [Pearson, Spearman, Kendall] {
                for to in [Pearson, Spearman, Kendall] {
                    let there = cor_convert(rho, from, to).unwrap();
                    let back = cor_convert(there, to, from).unwrap();
                    assert!((back - rho).abs() < 1e-12, "{from:?} -> {to:?} at {rho}");
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Parsing, matrix application and range checks.
    //
    // Given
    // -----
    // - "KENDALL", "phi"; a 2×2 Kendall matrix; ρ = 1.2.
    //
    // Expect
    // ------
    // - Kendall, `InvalidType`; unit diagonal, converted off-diagonal;
    //   `OutOfRange`.
    fn parsing_matrix_and_range() {
        assert_eq!("KENDALL".parse::<CorrelationType>().unwrap(), CorrelationType::Kendall);
        assert!(matches!(
            "phi".parse::<CorrelationType>(),
            Err(CorrelationError::InvalidType { .. })
        ));

        let m = array![[1.0, 1.0 / 3.0], [1.0 / 3.0, 1.0]];
        let p = cor_convert_matrix(&m, CorrelationType::Kendall, CorrelationType::Pearson).unwrap();
        assert_eq!(p[[0, 0]], 1.0);
        assert!((p[[0, 1]] - 0.5).abs() < 1e-12);
        assert_eq!(p[[0, 1]], p[[1, 0]]);

        assert!(matches!(
            cor_convert(1.2, CorrelationType::Pearson, CorrelationType::Kendall),
            Err(CorrelationError::OutOfRange { .. })
        ));
    }
}
