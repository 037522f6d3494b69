//! Expectation-maximization for univariate Gaussian mixtures
//!
//! [`Em`] consumes a slice of scalar observations and an initial
//! [`MixtureParams`] guess, and alternates two steps for a fixed number of
//! rounds:
//!
//! - **Expectation**: compute the log-joint `ln(wₖ) + ln N(xᵢ; μₖ, σₖ)` for
//!   every (observation, component) pair, then normalize in log space into
//!   posterior responsibilities (see [`Normalization`]).
//! - **Maximization**: re-estimate each component's weight, mean, and
//!   standard deviation from its responsibility-weighted moments.
//!
//! There is no convergence check: the loop always runs its full budget.
//! Degenerate configurations, where a component loses its responsibility
//! mass or its standard deviation collapses to zero, surface as [`EmError`]
//! values naming the component and the iteration.
use itertools::izip;
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dist::{Gaussian, GaussianError};
use crate::misc::{logsumexp, LogSumExp};
use crate::traits::HasDensity;

/// Mixture parameters as parallel arrays: one (weight, mean, standard
/// deviation) triple per component.
///
/// The arrays must have equal, nonzero length. `Default` is a fixed
/// two-component guess for callers with no better starting point.
///
/// # Example
///
/// ```
/// use mixfit::em::MixtureParams;
///
/// let params =
///     MixtureParams::new(vec![0.5, 0.5], vec![-1.0, 1.0], vec![1.0, 1.0])
///         .unwrap();
/// assert_eq!(params.k(), 2);
///
/// // Unequal lengths do not construct
/// assert!(
///     MixtureParams::new(vec![0.5, 0.5], vec![-1.0, 1.0, 3.0], vec![1.0, 1.0])
///         .is_err()
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct MixtureParams {
    weights: Vec<f64>,
    mus: Vec<f64>,
    sigmas: Vec<f64>,
}

impl MixtureParams {
    /// Create parameters from parallel weight, mean, and standard deviation
    /// arrays
    pub fn new(
        weights: Vec<f64>,
        mus: Vec<f64>,
        sigmas: Vec<f64>,
    ) -> Result<Self, EmError> {
        if weights.len() != mus.len() || weights.len() != sigmas.len() {
            Err(EmError::ShapeMismatch {
                n_weights: weights.len(),
                n_mus: mus.len(),
                n_sigmas: sigmas.len(),
            })
        } else if weights.is_empty() {
            Err(EmError::NoComponents)
        } else {
            Ok(MixtureParams {
                weights,
                mus,
                sigmas,
            })
        }
    }

    /// Number of components
    #[inline]
    #[must_use]
    pub fn k(&self) -> usize {
        self.weights.len()
    }

    /// Mixing weights, one per component
    #[inline]
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Means, one per component
    #[inline]
    #[must_use]
    pub fn mus(&self) -> &[f64] {
        &self.mus
    }

    /// Standard deviations, one per component
    #[inline]
    #[must_use]
    pub fn sigmas(&self) -> &[f64] {
        &self.sigmas
    }

    /// Decompose into (weights, means, standard deviations)
    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.weights, self.mus, self.sigmas)
    }
}

impl Default for MixtureParams {
    /// A fixed two-component starting guess: equal weights, coincident means,
    /// and slightly different spreads so the components can separate.
    fn default() -> Self {
        MixtureParams {
            weights: vec![0.5, 0.5],
            mus: vec![3.0, 3.0],
            sigmas: vec![0.5, 0.6],
        }
    }
}

/// How responsibilities are normalized after the expectation step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum Normalization {
    /// Subtract a single log-sum-exp taken over the entire N×K log-joint
    /// matrix. Responsibilities sum to 1 over the whole matrix rather than
    /// within each row, so observations with higher mixture likelihood carry
    /// more weight in the parameter updates.
    #[default]
    Joint,
    /// Subtract each row's own log-sum-exp so that every observation's
    /// responsibilities sum to 1. This is the standard posterior; the
    /// updated weights are divided by N to keep them on the simplex.
    PerObservation,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum EmError {
    /// The weight, mean, and standard deviation arrays have different lengths
    ShapeMismatch {
        n_weights: usize,
        n_mus: usize,
        n_sigmas: usize,
    },
    /// The initial guess describes zero components
    NoComponents,
    /// The observation slice is empty
    NoObservations,
    /// An initial weight is negative or non-finite
    InvalidWeight { component: usize, weight: f64 },
    /// An initial component's mean or standard deviation is invalid
    InvalidComponent {
        component: usize,
        source: GaussianError,
    },
    /// A component's responsibility mass vanished, so its moment updates
    /// divide by zero
    DegenerateComponent { component: usize, iteration: usize },
    /// An updated standard deviation was zero or non-finite
    SigmaCollapsed {
        component: usize,
        iteration: usize,
        sigma: f64,
    },
}

/// Expectation-maximization estimator for univariate Gaussian mixtures
///
/// The estimator is a pure function of its inputs: it holds only
/// configuration, never data, and two calls with identical arguments return
/// identical results.
///
/// A fit with iteration budget `n_iters` performs `n_iters - 1` update
/// rounds, so `Em::new(1).fit_from(xs, guess)` returns `guess` unchanged and
/// `Em::new(2)` performs exactly one update. Iterations reported in errors
/// are 1-based.
///
/// # Example
///
/// ```
/// use mixfit::em::{Em, MixtureParams};
///
/// let xs = [1.0, 1.1, 5.0, 5.2];
/// let guess =
///     MixtureParams::new(vec![0.5, 0.5], vec![1.0, 5.0], vec![1.0, 1.0])
///         .unwrap();
///
/// let est = Em::new(2).fit_from(&xs, guess).unwrap();
///
/// // One update step pulls each mean into its cluster
/// assert!(est.mus()[0] > 1.0 && est.mus()[0] < 1.1);
/// assert!(est.mus()[1] > 5.0 && est.mus()[1] < 5.2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Em {
    n_iters: usize,
    normalization: Normalization,
}

impl Em {
    /// Create an estimator with the given iteration budget and [`Joint`]
    /// normalization
    ///
    /// [`Joint`]: Normalization::Joint
    #[must_use]
    pub fn new(n_iters: usize) -> Self {
        Em {
            n_iters,
            normalization: Normalization::default(),
        }
    }

    /// Set the responsibility normalization
    #[must_use]
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Iteration budget
    #[inline]
    #[must_use]
    pub fn n_iters(&self) -> usize {
        self.n_iters
    }

    /// Responsibility normalization
    #[inline]
    #[must_use]
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Fit starting from the default two-component guess
    pub fn fit(&self, xs: &[f64]) -> Result<MixtureParams, EmError> {
        self.fit_from(xs, MixtureParams::default())
    }

    /// Fit starting from an explicit guess
    ///
    /// Component count and ordering are taken from the guess and preserved
    /// in the result.
    pub fn fit_from(
        &self,
        xs: &[f64],
        guess: MixtureParams,
    ) -> Result<MixtureParams, EmError> {
        if guess.weights.len() != guess.mus.len()
            || guess.weights.len() != guess.sigmas.len()
        {
            return Err(EmError::ShapeMismatch {
                n_weights: guess.weights.len(),
                n_mus: guess.mus.len(),
                n_sigmas: guess.sigmas.len(),
            });
        }
        if guess.weights.is_empty() {
            return Err(EmError::NoComponents);
        }
        if xs.is_empty() {
            return Err(EmError::NoObservations);
        }

        let k = guess.k();
        let n = xs.len();

        let mut weights: Vec<f64> = Vec::with_capacity(k);
        let mut components: Vec<Gaussian> = Vec::with_capacity(k);
        for (ix, (&w, &mu, &sigma)) in
            izip!(&guess.weights, &guess.mus, &guess.sigmas).enumerate()
        {
            if w < 0.0 || !w.is_finite() {
                return Err(EmError::InvalidWeight {
                    component: ix,
                    weight: w,
                });
            }
            let cpnt = Gaussian::new(mu, sigma).map_err(|source| {
                EmError::InvalidComponent {
                    component: ix,
                    source,
                }
            })?;
            weights.push(w);
            components.push(cpnt);
        }

        // N×K responsibility scratch, row-major: resp[i*k + j] is the
        // posterior that observation i came from component j
        let mut resp: Vec<f64> = vec![0.0; n * k];

        for iteration in 1..self.n_iters {
            // Expectation: fill with log-joints ln(w_j) + ln_f(x_i)
            let ln_weights: Vec<f64> =
                weights.iter().map(|w| w.ln()).collect();
            for (row, x) in resp.chunks_mut(k).zip(xs.iter()) {
                for (r, (&ln_w, cpnt)) in row
                    .iter_mut()
                    .zip(ln_weights.iter().zip(components.iter()))
                {
                    *r = ln_w + cpnt.ln_f(x);
                }
            }

            // Normalize into posterior responsibilities
            match self.normalization {
                Normalization::Joint => {
                    let z = resp.iter().copied().logsumexp();
                    resp.iter_mut().for_each(|r| *r = (*r - z).exp());
                }
                Normalization::PerObservation => {
                    for row in resp.chunks_mut(k) {
                        let z = logsumexp(row);
                        row.iter_mut().for_each(|r| *r = (*r - z).exp());
                    }
                }
            }

            // Maximization: weighted moments per component
            for (j, (weight, cpnt)) in
                weights.iter_mut().zip(components.iter_mut()).enumerate()
            {
                let mass: f64 = resp.iter().skip(j).step_by(k).sum();
                if mass <= 0.0 || !mass.is_finite() {
                    return Err(EmError::DegenerateComponent {
                        component: j,
                        iteration,
                    });
                }

                let mu = resp
                    .iter()
                    .skip(j)
                    .step_by(k)
                    .zip(xs.iter())
                    .map(|(&r, &x)| r * x)
                    .sum::<f64>()
                    / mass;
                if !mu.is_finite() {
                    return Err(EmError::DegenerateComponent {
                        component: j,
                        iteration,
                    });
                }

                let sigma = (resp
                    .iter()
                    .skip(j)
                    .step_by(k)
                    .zip(xs.iter())
                    .map(|(&r, &x)| r * (x - mu) * (x - mu))
                    .sum::<f64>()
                    / mass)
                    .sqrt();
                if sigma <= 0.0 || !sigma.is_finite() {
                    return Err(EmError::SigmaCollapsed {
                        component: j,
                        iteration,
                        sigma,
                    });
                }

                *weight = match self.normalization {
                    Normalization::Joint => mass,
                    Normalization::PerObservation => mass / n as f64,
                };
                cpnt.set_mu_unchecked(mu);
                cpnt.set_sigma_unchecked(sigma);
            }
        }

        Ok(MixtureParams {
            weights,
            mus: components.iter().map(|cpnt| cpnt.mu()).collect(),
            sigmas: components.iter().map(|cpnt| cpnt.sigma()).collect(),
        })
    }
}

impl Default for Em {
    /// 100 iterations, [`Joint`](Normalization::Joint) normalization
    fn default() -> Self {
        Em::new(100)
    }
}

impl std::error::Error for EmError {}

impl fmt::Display for EmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                n_weights,
                n_mus,
                n_sigmas,
            } => write!(
                f,
                "parameter arrays have different lengths: {n_weights} \
                 weights, {n_mus} means, {n_sigmas} standard deviations"
            ),
            Self::NoComponents => {
                write!(f, "initial guess describes zero components")
            }
            Self::NoObservations => write!(f, "empty observation slice"),
            Self::InvalidWeight { component, weight } => write!(
                f,
                "initial weight for component {component} ({weight}) is \
                 negative or non-finite"
            ),
            Self::InvalidComponent { component, source } => {
                write!(f, "invalid initial component {component}: {source}")
            }
            Self::DegenerateComponent {
                component,
                iteration,
            } => write!(
                f,
                "component {component} lost all responsibility mass at \
                 iteration {iteration}"
            ),
            Self::SigmaCollapsed {
                component,
                iteration,
                sigma,
            } => write!(
                f,
                "sigma for component {component} collapsed to {sigma} at \
                 iteration {iteration}"
            ),
        }
    }
}
