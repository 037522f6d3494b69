//! Re-imports for convenience
#[doc(no_inline)]
pub use crate::dist::{Gaussian, GaussianError, Mixture, MixtureError};
#[doc(no_inline)]
pub use crate::em::{Em, EmError, MixtureParams, Normalization};
#[doc(no_inline)]
pub use crate::misc::LogSumExp;
#[doc(no_inline)]
pub use crate::traits::*;
