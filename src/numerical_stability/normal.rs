//! Standard normal helpers built on `statrs` special functions.
//!
//! The density, distribution and quantile of `N(0, 1)` are evaluated many
//! thousands of times per pairwise solve, so they are implemented directly
//! on top of `erfc` / `erfc_inv` instead of going through a
//! `statrs::distribution::Normal` value.
//!
//! Conventions
//! -----------
//! - `std_normal_cdf(±∞)` is exactly `1.0` / `0.0`.
//! - `std_normal_quantile(0.0) = -∞` and `std_normal_quantile(1.0) = +∞`;
//!   inputs outside `[0, 1]` yield `NaN`.
use statrs::function::erf::{erfc, erfc_inv};
use std::f64::consts::{FRAC_1_SQRT_2, PI, SQRT_2};

/// `1 / √(2π)`.
pub const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal density φ(x).
#[inline]
pub fn std_normal_pdf(x: f64) -> f64 {
    if x.is_infinite() {
        return 0.0;
    }
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF Φ(x) = ½·erfc(−x/√2).
#[inline]
pub fn std_normal_cdf(x: f64) -> f64 {
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Standard normal quantile Φ⁻¹(p) = −√2·erfc⁻¹(2p).
#[inline]
pub fn std_normal_quantile(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) || p.is_nan() {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// `√π`, the total mass of the Physicists' Hermite weight `e^{-x²}`.
#[inline]
pub fn sqrt_pi() -> f64 {
    PI.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Known values of φ, Φ and Φ⁻¹.
    // - Behaviour at ±∞ and at the probability endpoints.
    //
    // They intentionally DO NOT cover:
    // - Accuracy of the underlying `statrs` special functions in the far
    //   tails, which is the responsibility of that crate.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check Φ and φ against textbook values.
    //
    // Given
    // -----
    // - x = 0 and x = 1.96.
    //
    // Expect
    // ------
    // - Φ(0) = 0.5, φ(0) = 1/√(2π), Φ(1.96) ≈ 0.975.
    fn normal_cdf_and_pdf_match_reference_values() {
        // Arrange / Act
        let c0 = std_normal_cdf(0.0);
        let p0 = std_normal_pdf(0.0);
        let c196 = std_normal_cdf(1.96);

        // Assert
        assert!((c0 - 0.5).abs() < 1e-15);
        assert!((p0 - FRAC_1_SQRT_2PI).abs() < 1e-15);
        assert!((c196 - 0.975_002_104_851_780).abs() < 1e-9, "Φ(1.96) = {c196}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure Φ⁻¹ inverts Φ on the interior and maps endpoints to ±∞.
    //
    // Given
    // -----
    // - A grid of x values in [-6, 6].
    //
    // Expect
    // ------
    // - Φ⁻¹(Φ(x)) ≈ x and Φ⁻¹(0) = -∞, Φ⁻¹(1) = +∞.
    fn normal_quantile_inverts_cdf() {
        for i in -12..=12 {
            // Arrange
            let x = i as f64 * 0.5;

            // Act
            let back = std_normal_quantile(std_normal_cdf(x));

            // Assert
            assert!((back - x).abs() < 1e-7, "x = {x}, back = {back}");
        }
        assert_eq!(std_normal_quantile(0.0), f64::NEG_INFINITY);
        assert_eq!(std_normal_quantile(1.0), f64::INFINITY);
        assert!(std_normal_quantile(1.5).is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Verify exact limits at ±∞.
    //
    // Given
    // -----
    // - x = ±∞.
    //
    // Expect
    // ------
    // - φ(±∞) = 0, Φ(-∞) = 0, Φ(+∞) = 1.
    fn normal_helpers_are_exact_at_infinity() {
        assert_eq!(std_normal_pdf(f64::INFINITY), 0.0);
        assert_eq!(std_normal_pdf(f64::NEG_INFINITY), 0.0);
        assert_eq!(std_normal_cdf(f64::NEG_INFINITY), 0.0);
        assert_eq!(std_normal_cdf(f64::INFINITY), 1.0);
    }
}
