//! Property-based tests with proptest.
//!
//! Covers: Hermite recurrences and convention conversions, random
//! correlation generators, both repair engines (including repair of noisy
//! generated matrices and idempotence), closed-form correlation
//! conversion, the identity matching of normal pairs and the bounds of
//! matched targets.

use ndarray::Array2;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rust_mvsim::correlation::{CorrelationType, cor_convert};
use rust_mvsim::hermite::{
    hermite_phys, hermite_prob, hermite_prob_all, physicists_from_probabilists,
    probabilists_from_physicists,
};
use rust_mvsim::margins::Continuous;
use rust_mvsim::nearest::{
    NearPSDOptions, NearestPDOptions, cor_near_pd, cor_near_psd, cor_rand_pd, cor_rand_psd,
    min_eigenvalue,
};
use rust_mvsim::pearson::{MatchOptions, correlation_bounds, latent_correlation};
use statrs::distribution::{Exp, Normal};

// ── Hermite Properties ───────────────────────────────────────────────

proptest! {
    /// He_{n+1}(x) = x·He_n(x) − n·He_{n−1}(x) for every degree up to 20.
    #[test]
    fn prob_hermite_satisfies_three_term_recurrence(x in -3.0f64..3.0, n in 1usize..20) {
        let lhs = hermite_prob(x, n + 1);
        let rhs = x * hermite_prob(x, n) - n as f64 * hermite_prob(x, n - 1);
        let scale = magnitude_bound(x, n + 1);
        prop_assert!((lhs - rhs).abs() <= 1e-10 * scale, "lhs {} rhs {}", lhs, rhs);
    }

    /// The one-pass table agrees with single evaluations.
    #[test]
    fn prob_all_matches_pointwise(x in -3.0f64..3.0, n in 0usize..=20) {
        let all = hermite_prob_all(x, n);
        prop_assert_eq!(all.len(), n + 1);
        for (k, v) in all.iter().enumerate() {
            prop_assert!((v - hermite_prob(x, k)).abs() <= 1e-12 * magnitude_bound(x, k));
        }
    }

    /// Converting between conventions reproduces direct evaluation.
    #[test]
    fn convention_conversions_round_trip(x in -2.0f64..2.0, n in 0usize..=20) {
        let phys = hermite_phys(x, n);
        let prob = hermite_prob(x, n);
        let phys_scale = 2f64.powf(n as f64 / 2.0) * magnitude_bound(std::f64::consts::SQRT_2 * x, n);
        prop_assert!((physicists_from_probabilists(x, n) - phys).abs() <= 1e-10 * phys_scale);
        prop_assert!((probabilists_from_physicists(x, n) - prob).abs() <= 1e-10 * magnitude_bound(x, n));
    }
}

// ── Random Generator Properties ──────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// C-vine matrices are symmetric with unit diagonal and positive definite.
    #[test]
    fn rand_pd_is_valid(d in 1usize..=50, alpha in 1.0f64..5.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let s = cor_rand_pd(&mut rng, d, alpha).unwrap();
        assert_correlation_shape(&s)?;
        prop_assert!(min_eigenvalue(&s).unwrap() > 0.0);
    }

    /// Factor matrices are valid PSD correlation matrices for any rank.
    #[test]
    fn rand_psd_is_valid((d, k) in (1usize..=50).prop_flat_map(|d| (Just(d), 1usize..=d)), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let s = cor_rand_psd(&mut rng, d, k).unwrap();
        assert_correlation_shape(&s)?;
        prop_assert!(min_eigenvalue(&s).unwrap() > -1e-9);
    }
}

// ── Repair Properties ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The Newton engine returns unit diagonal and λ_min ≥ τ for any
    /// symmetric input with unit diagonal.
    #[test]
    fn near_pd_output_is_valid(m in symmetric_unit_diag()) {
        let opts = NearestPDOptions::default();
        let out = cor_near_pd(&m, &opts).unwrap();
        prop_assert!(out.converged, "status: {}", out.status);
        assert_correlation_shape(&out.matrix)?;
        prop_assert!(min_eigenvalue(&out.matrix).unwrap() >= opts.tau - 1e-8);
    }

    /// Alternating projections return a PSD correlation matrix.
    #[test]
    fn near_psd_output_is_valid(m in symmetric_unit_diag()) {
        let out = cor_near_psd(&m, &NearPSDOptions::default()).unwrap();
        assert_correlation_shape(&out)?;
        prop_assert!(min_eigenvalue(&out).unwrap() >= -1e-8);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Generated matrices perturbed by symmetric noise are pulled back to
    /// valid correlation matrices.
    #[test]
    fn noisy_generated_matrices_are_repaired(d in 2usize..=50, noise in 0.05f64..0.3, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let clean = cor_rand_pd(&mut rng, d, 1.0).unwrap();
        let noisy = add_symmetric_noise(&clean, noise, &mut rng);
        let opts = NearestPDOptions::default();

        let out = cor_near_pd(&noisy, &opts).unwrap();

        prop_assert!(out.converged, "status: {}", out.status);
        assert_correlation_shape(&out.matrix)?;
        prop_assert!(min_eigenvalue(&out.matrix).unwrap() >= opts.tau - 1e-6);
    }

    /// Correlation matrices already above the eigenvalue floor come back
    /// unchanged.
    #[test]
    fn repair_is_idempotent_above_the_floor(d in 2usize..=30, alpha in 1.0f64..5.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let r = cor_rand_pd(&mut rng, d, alpha).unwrap();
        let opts = NearestPDOptions::default();
        prop_assume!(min_eigenvalue(&r).unwrap() >= opts.tau);

        let out = cor_near_pd(&r, &opts).unwrap();

        prop_assert!(out.converged);
        let max_diff =
            out.matrix.iter().zip(r.iter()).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max);
        prop_assert!(max_diff < 1e-10, "max diff {}", max_diff);
    }
}

// ── Conversion and Matching Properties ───────────────────────────────

proptest! {
    /// Every conversion is inverted by the reverse conversion.
    #[test]
    fn cor_convert_round_trips(rho in -0.99f64..=0.99, from in 0usize..3, to in 0usize..3) {
        let types = [CorrelationType::Pearson, CorrelationType::Spearman, CorrelationType::Kendall];
        let there = cor_convert(rho, types[from], types[to]).unwrap();
        let back = cor_convert(there, types[to], types[from]).unwrap();
        prop_assert!(there.abs() <= 1.0);
        prop_assert!((back - rho).abs() < 1e-9);
    }

    /// Two normal marginals need no adjustment: ρz = ρx.
    #[test]
    fn normal_pairs_match_identically(target in -0.99f64..0.99, mu in -5.0f64..5.0, sigma in 0.1f64..10.0) {
        let a = Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap();
        let b = Continuous::new(Normal::new(mu, sigma).unwrap()).unwrap();
        let rho = latent_correlation(target, &a, &b, &MatchOptions::default()).unwrap();
        prop_assert!((rho - target).abs() < 1e-6, "target {} got {}", target, rho);
    }

    /// Targets inside the bounds are matched; for a normal × exponential
    /// pair the correlation map is linear with slope equal to the upper
    /// bound.
    #[test]
    fn achievable_targets_lie_within_bounds(frac in -0.95f64..0.95) {
        let a = Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap();
        let b = Continuous::new(Exp::new(1.0).unwrap()).unwrap();
        let opts = MatchOptions::default();
        let bounds = correlation_bounds(&a, &b, &opts).unwrap();
        let target = if frac >= 0.0 { frac * bounds.upper } else { -frac * bounds.lower };

        let rho = latent_correlation(target, &a, &b, &opts).unwrap();

        prop_assert!(bounds.lower <= target && target <= bounds.upper);
        prop_assert!(rho.abs() <= 1.0);
        prop_assert!((rho * bounds.upper - target).abs() < 1e-8, "rho {} target {}", rho, target);
    }
}

// ---- Helper Methods ----

/// Upper bound on the magnitude of the terms of the Probabilists'
/// recurrence, used to scale round-off tolerances.
fn magnitude_bound(x: f64, n: usize) -> f64 {
    let (mut prev, mut cur) = (1.0_f64, x.abs());
    if n == 0 {
        return 1.0;
    }
    for k in 1..n {
        let next = x.abs() * cur + k as f64 * prev;
        prev = cur;
        cur = next;
    }
    cur.max(1.0)
}

fn symmetric_unit_diag() -> impl Strategy<Value = Array2<f64>> {
    (2usize..=8).prop_flat_map(|d| {
        prop::collection::vec(-1.0f64..1.0, d * d).prop_map(move |v| {
            let mut m = Array2::<f64>::eye(d);
            for i in 0..d {
                for j in (i + 1)..d {
                    m[[i, j]] = v[i * d + j];
                    m[[j, i]] = v[i * d + j];
                }
            }
            m
        })
    })
}

/// Adds `U(−noise, noise)` to every off-diagonal pair, clipped to `[−1, 1]`.
fn add_symmetric_noise(m: &Array2<f64>, noise: f64, rng: &mut StdRng) -> Array2<f64> {
    let d = m.nrows();
    let mut out = m.clone();
    for i in 0..d {
        for j in (i + 1)..d {
            let v = (m[[i, j]] + rng.random_range(-noise..noise)).clamp(-1.0, 1.0);
            out[[i, j]] = v;
            out[[j, i]] = v;
        }
    }
    out
}

fn assert_correlation_shape(m: &Array2<f64>) -> Result<(), TestCaseError> {
    let d = m.nrows();
    for i in 0..d {
        prop_assert!((m[[i, i]] - 1.0).abs() < 1e-12);
        for j in 0..d {
            prop_assert!((m[[i, j]] - m[[j, i]]).abs() < 1e-12);
            prop_assert!(m[[i, j]].abs() <= 1.0 + 1e-12);
        }
    }
    Ok(())
}
