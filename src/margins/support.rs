//! margins::support — cached support enumeration for discrete marginals.
//!
//! Purpose
//! -------
//! Enumerate the support points of a discrete marginal once, together with
//! their normal-scale breakpoints, so that every pairwise solve involving
//! that marginal reuses them.
//!
//! Key behaviors
//! -------------
//! - Walk the integer lattice between the support endpoints and keep the
//!   points carrying positive mass. Mass whose quantile falls strictly
//!   between two lattice points is rejected rather than relabelled.
//! - For a point set `a_0 < … < a_{m-1}` compute breakpoints
//!   `α_0 = -∞`, `α_{r+1} = Φ⁻¹(F(a_r))` for `r < m - 1`, `α_m = +∞`, so
//!   that `X = a_r` exactly when the latent normal falls in `(α_r, α_{r+1}]`.
//! - Truncate unbounded supports at `F⁻¹(1 - DISCRETE_TAIL_MASS)`; the
//!   final breakpoint is always `+∞`, so the tail mass is folded into the
//!   last retained point.
//!
//! Invariants & assumptions
//! ------------------------
//! - `breaks.len() == points.len() + 1` and `breaks` is non-decreasing.
//! - At least two support points; a point mass has no correlation to match.
use crate::margins::{
    errors::{MarginError, MarginResult},
    marginal::Marginal,
};
use crate::numerical_stability::{
    constants::{DISCRETE_TAIL_MASS, MAX_SUPPORT_POINTS},
    normal::std_normal_quantile,
};

/// Fraction of a lattice step's mass used to locate its first support point.
const STEP_MASS_FRACTION: f64 = 1e-9;

/// DiscreteSupport — support points and latent breakpoints of a discrete marginal.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteSupport {
    points: Vec<f64>,
    breaks: Vec<f64>,
}

impl DiscreteSupport {
    /// Enumerate the support of `marginal`.
    ///
    /// # Errors
    /// - [`MarginError::InvalidSupport`] when the marginal is continuous, when
    ///   the endpoints are not finite after tail truncation or are reversed,
    ///   or when mass sits off the integer lattice.
    /// - [`MarginError::SupportTooLarge`] when more than
    ///   [`MAX_SUPPORT_POINTS`] lattice points would be scanned.
    /// - [`MarginError::DegenerateSupport`] when fewer than two points carry
    ///   mass.
    pub fn new(marginal: &dyn Marginal) -> MarginResult<Self> {
        let (mut lower, mut upper) = marginal.support();
        if !marginal.is_discrete() {
            return Err(MarginError::InvalidSupport {
                lower,
                upper,
                reason: "marginal is not discrete",
            });
        }
        if lower == f64::NEG_INFINITY {
            lower = marginal.quantile(DISCRETE_TAIL_MASS);
        }
        if upper == f64::INFINITY {
            upper = marginal.quantile(1.0 - DISCRETE_TAIL_MASS);
        }
        if !lower.is_finite() || !upper.is_finite() || upper < lower {
            return Err(MarginError::InvalidSupport {
                lower,
                upper,
                reason: "endpoints must be finite and ordered",
            });
        }
        let lower = lower.floor();
        let upper = upper.ceil();
        let span = (upper - lower) as usize + 1;
        if span > MAX_SUPPORT_POINTS {
            return Err(MarginError::SupportTooLarge { points: span, limit: MAX_SUPPORT_POINTS });
        }

        let mut points = Vec::new();
        let mut cum = Vec::new();
        let mut prev = marginal.cdf(lower - 1.0);
        for step in 0..span {
            let x = lower + step as f64;
            let f = marginal.cdf(x);
            if f > prev {
                let inner = marginal.quantile(prev + STEP_MASS_FRACTION * (f - prev));
                if inner > x - 1.0 && inner < x {
                    return Err(MarginError::InvalidSupport {
                        lower: inner,
                        upper: x,
                        reason: "support points must be integers",
                    });
                }
                points.push(x);
                cum.push(f);
                prev = f;
            }
        }
        if points.len() < 2 {
            return Err(MarginError::DegenerateSupport);
        }

        let m = points.len();
        let mut breaks = Vec::with_capacity(m + 1);
        breaks.push(f64::NEG_INFINITY);
        for &f in cum.iter().take(m - 1) {
            breaks.push(std_normal_quantile(f.min(1.0)));
        }
        breaks.push(f64::INFINITY);
        Ok(Self { points, breaks })
    }

    /// Support points `a_r` in increasing order.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Latent breakpoints `α_0 = -∞ ≤ … ≤ α_m = +∞`.
    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::margins::marginal::{Continuous, Discrete};
    use statrs::distribution::{Bernoulli, Binomial, Normal, Poisson};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Point and breakpoint layout for bounded supports.
    // - Tail truncation for unbounded supports.
    // - Rejection of continuous, degenerate or off-lattice inputs.
    //
    // They intentionally DO NOT cover:
    // - How breakpoints are consumed by the matching sums (see `pearson`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Bernoulli(0.3) has two points with a single interior breakpoint.
    //
    // Given
    // -----
    // - Bernoulli(0.3).
    //
    // Expect
    // ------
    // - points = [0, 1], breaks = [-∞, Φ⁻¹(0.7), +∞].
    fn bernoulli_support_has_one_interior_break() {
        // Arrange
        let m = Discrete::new(Bernoulli::new(0.3).unwrap()).unwrap();

        // Act
        let s = DiscreteSupport::new(&m).unwrap();

        // Assert
        assert_eq!(s.points(), &[0.0, 1.0]);
        assert_eq!(s.breaks().len(), 3);
        assert_eq!(s.breaks()[0], f64::NEG_INFINITY);
        assert_eq!(s.breaks()[2], f64::INFINITY);
        assert!((s.breaks()[1] - std_normal_quantile(0.7)).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Unbounded supports are truncated and the tail is folded into the
    // last point.
    //
    // Given
    // -----
    // - Poisson(4).
    //
    // Expect
    // ------
    // - First point 0, last point ≥ F⁻¹(1 - 1e-5), last break +∞, breaks
    //   non-decreasing.
    fn poisson_support_is_truncated_with_infinite_last_break() {
        // Arrange
        let m = Discrete::new(Poisson::new(4.0).unwrap()).unwrap();

        // Act
        let s = DiscreteSupport::new(&m).unwrap();

        // Assert
        assert_eq!(s.points()[0], 0.0);
        assert!(*s.points().last().unwrap() >= m.quantile(1.0 - DISCRETE_TAIL_MASS));
        assert_eq!(*s.breaks().last().unwrap(), f64::INFINITY);
        assert!(s.breaks().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(s.breaks().len(), s.len() + 1);
    }

    #[test]
    // Purpose
    // -------
    // A continuous marginal has no finite lattice support.
    //
    // Given
    // -----
    // - Normal(0, 1) passed as a marginal.
    //
    // Expect
    // ------
    // - `InvalidSupport`.
    fn continuous_marginal_is_rejected() {
        // Arrange
        let m = Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap();

        // Act
        let res = DiscreteSupport::new(&m);

        // Assert
        assert!(matches!(res, Err(MarginError::InvalidSupport { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Points with zero mass inside the range are skipped.
    //
    // Given
    // -----
    // - Binomial(3, 0.5), whose support is {0, 1, 2, 3}.
    //
    // Expect
    // ------
    // - Exactly four points.
    fn binomial_support_keeps_only_mass_points() {
        // Arrange
        let m = Discrete::new(Binomial::new(0.5, 3).unwrap()).unwrap();

        // Act
        let s = DiscreteSupport::new(&m).unwrap();

        // Assert
        assert_eq!(s.points(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    // Purpose
    // -------
    // Mass between integers is reported instead of being merged into the
    // next lattice point.
    //
    // Given
    // -----
    // - Masses 1/4, 1/4, 1/2 on {0, 0.5, 1}; the half-integer point carries
    //   less mass than the lattice point above it.
    //
    // Expect
    // ------
    // - `InvalidSupport` naming 0.5 as the off-lattice point.
    fn half_integer_support_is_rejected() {
        // Arrange
        let m = OffLattice;

        // Act
        let res = DiscreteSupport::new(&m);

        // Assert
        match res {
            Err(MarginError::InvalidSupport { lower, upper, .. }) => {
                assert_eq!((lower, upper), (0.5, 1.0));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    // ---- Helper Methods ----

    /// Masses 1/4, 1/4, 1/2 on {0, 0.5, 1}.
    struct OffLattice;

    impl Marginal for OffLattice {
        fn quantile(&self, p: f64) -> f64 {
            if p <= 0.25 {
                0.0
            } else if p <= 0.5 {
                0.5
            } else {
                1.0
            }
        }

        fn cdf(&self, x: f64) -> f64 {
            if x < 0.0 {
                0.0
            } else if x < 0.5 {
                0.25
            } else if x < 1.0 {
                0.5
            } else {
                1.0
            }
        }

        fn is_discrete(&self) -> bool {
            true
        }

        fn mean(&self) -> f64 {
            0.625
        }

        fn std_dev(&self) -> f64 {
            0.171875_f64.sqrt()
        }
    }
}
