//! correlation — correlation types, Gaussian-copula conversions and sample
//! estimates.
//!
//! Purpose
//! -------
//! - [`cor_convert`] / [`cor_convert_matrix`]: closed-form maps between
//!   Pearson, Spearman and Kendall coefficients of a bivariate normal.
//! - [`cor`]: sample correlation matrix of `n × d` data.
//!
//! Downstream usage
//! ----------------
//! - `simulation::MvDistribution::new` converts rank-correlation targets to
//!   latent Pearson correlations with [`cor_convert_matrix`].
//! - Integration tests compare simulated draws with their targets via
//!   [`cor`].
pub mod convert;
pub mod errors;
pub mod sample;

pub use self::convert::{CorrelationType, cor_convert, cor_convert_matrix};
pub use self::errors::{CorrelationError, CorrelationResult};
pub use self::sample::cor;
