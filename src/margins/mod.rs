//! margins — marginal distributions consumed by NORTA.
//!
//! Purpose
//! -------
//! Describe the per-coordinate distributions of a NORTA vector: the
//! [`Marginal`] capability (quantile, CDF, discreteness, moments), adapters
//! for `statrs` distributions, and the cached discrete-support enumeration
//! used by the discrete matching formulas.
//!
//! Key behaviors
//! -------------
//! - [`Continuous`] / [`Discrete`] adapters validate moments once.
//! - [`DiscreteSupport`] enumerates integer support points and their latent
//!   normal breakpoints.
//!
//! Invariants & assumptions
//! ------------------------
//! - Marginals are immutable and shared by reference across threads.
//! - Discrete marginals live on the integer lattice.
//!
//! Downstream usage
//! ----------------
//! - Wrap `statrs` distributions and pass them as `&dyn Marginal` or
//!   `Arc<dyn Marginal>` to `pearson` and `simulation`:
//!
//!   ```rust
//!   use rust_mvsim::margins::{Continuous, Discrete, Marginal};
//!   use statrs::distribution::{Exp, Poisson};
//!
//!   let a = Continuous::new(Exp::new(1.0).unwrap()).unwrap();
//!   let b = Discrete::new(Poisson::new(3.0).unwrap()).unwrap();
//!   assert!(!a.is_discrete() && b.is_discrete());
//!   ```
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own invariants; matching
//!   behaviour is tested in `pearson`.

pub mod errors;
pub mod marginal;
pub mod support;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{MarginError, MarginResult};
pub use self::marginal::{Continuous, Discrete, Marginal};
pub use self::support::DiscreteSupport;
