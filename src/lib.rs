//! Fit univariate Gaussian mixtures to unlabeled samples with
//! expectation-maximization.
//!
//! Given a sequence of scalar observations believed to come from a mixture of
//! K Gaussian components, [`em::Em`] iteratively re-estimates each
//! component's mixing weight, mean, and standard deviation for a fixed number
//! of rounds. The expectation step works entirely in log space and is
//! stabilized with [log-sum-exp](misc::LogSumExp), so small densities do not
//! underflow to zero before they are compared.
//!
//! The crate also ships the pieces the estimator is built from, since they
//! are useful on their own:
//!
//! - [`dist::Gaussian`]: closed-form log-density and sampling
//! - [`dist::Mixture`]: weighted combination of components and sampling
//! - [`misc`]: log-sum-exp and categorical draws
//!
//! # Example
//!
//! Draw data from a known two-component mixture, then recover its parameters:
//!
//! ```
//! use mixfit::dist::{Gaussian, Mixture};
//! use mixfit::em::{Em, MixtureParams, Normalization};
//! use mixfit::traits::*;
//!
//! let mut rng = rand::thread_rng();
//!
//! let truth = Mixture::new(
//!     vec![0.3, 0.7],
//!     vec![
//!         Gaussian::new(2.0, 0.5).unwrap(),
//!         Gaussian::new(5.0, 0.7).unwrap(),
//!     ],
//! )
//! .unwrap();
//!
//! let xs: Vec<f64> = truth.sample(2_000, &mut rng);
//!
//! let guess = MixtureParams::new(
//!     vec![0.5, 0.5],
//!     vec![1.0, 6.0],
//!     vec![1.0, 1.0],
//! )
//! .unwrap();
//!
//! let est = Em::new(100)
//!     .with_normalization(Normalization::PerObservation)
//!     .fit_from(&xs, guess)
//!     .unwrap();
//!
//! assert_eq!(est.k(), 2);
//! assert!(est.sigmas().iter().all(|&s| s > 0.0 && s.is_finite()));
//! ```
//!
//! # Feature flags
//!
//! - `serde1`: enables serde derives on parameter types
pub mod consts;
pub mod dist;
pub mod em;
pub mod misc;
pub mod prelude;
pub mod traits;

macro_rules! impl_display {
    ($kind: ty) => {
        impl std::fmt::Display for $kind {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", String::from(self))
            }
        }
    };
}

pub(crate) use impl_display;
