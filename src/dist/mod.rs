//! Probability distributions
pub mod gaussian;
pub mod mixture;

pub use self::gaussian::{Gaussian, GaussianError};
pub use self::mixture::{Mixture, MixtureError};
