//! simulation — NORTA sampling of correlated random vectors.
//!
//! Purpose
//! -------
//! Tie the crate together: turn a target correlation matrix and a list of
//! marginals into a valid latent normal correlation matrix, then draw
//! vectors by pushing correlated standard normals through each marginal's
//! quantile function.
//!
//! Key behaviors
//! -------------
//! - [`normal_to_margin`]: `F⁻¹(Φ(z))` elementwise.
//! - [`rvec`]: one-shot sampling from a latent correlation matrix.
//! - [`MvDistribution`]: matching and repair done once, sampling many times.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use std::sync::Arc;
//! use ndarray::array;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rust_mvsim::correlation::CorrelationType;
//! use rust_mvsim::margins::{Continuous, Marginal};
//! use rust_mvsim::simulation::{MvDistribution, SimOptions};
//! use statrs::distribution::{Exp, Normal};
//!
//! let margins: Vec<Arc<dyn Marginal>> = vec![
//!     Arc::new(Continuous::new(Normal::new(0.0, 1.0).unwrap()).unwrap()),
//!     Arc::new(Continuous::new(Exp::new(1.0).unwrap()).unwrap()),
//! ];
//! let target = array![[1.0, 0.4], [0.4, 1.0]];
//! let dist = MvDistribution::new(&target, margins, CorrelationType::Pearson, &SimOptions::default())
//!     .unwrap();
//! let draws = dist.sample(&mut StdRng::seed_from_u64(1), 100);
//! assert_eq!(draws.dim(), (100, 2));
//! ```

pub mod errors;
pub mod mvdist;

pub use self::errors::{SimError, SimResult};
pub use self::mvdist::{MvDistribution, SimOptions, normal_to_margin, rvec};
