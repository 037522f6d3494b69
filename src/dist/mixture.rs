//! Mixture distribution over a set of weighted components
use crate::misc::{pflip, LogSumExp};
use crate::traits::{
    ContinuousDistr, HasDensity, Mean, Sampleable, Support, Variance,
};
use rand::Rng;
use std::fmt;

/// [Mixture distribution](https://en.wikipedia.org/wiki/Mixture_distribution)
/// over components of type `Fx`: Σₖ wₖ fₖ(x).
///
/// This is the generating side of the estimation problem: draw from a
/// `Mixture<Gaussian>` to produce the kind of data [`crate::em::Em`] is meant
/// to fit.
///
/// # Example
///
/// ```
/// use mixfit::dist::{Gaussian, Mixture};
/// use mixfit::traits::*;
///
/// let bimodal = Mixture::uniform(vec![
///     Gaussian::new(-2.0, 1.0).unwrap(),
///     Gaussian::new(2.0, 1.0).unwrap(),
/// ])
/// .unwrap();
///
/// // Mass splits evenly, so the density at 0 is the density of either
/// // component at a distance of 2 from its mean.
/// let f_mid = bimodal.f(&0.0_f64);
/// let f_cpnt = Gaussian::standard().f(&2.0_f64);
/// assert!((f_mid - f_cpnt).abs() < 1E-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mixture<Fx> {
    /// Mixing weights. Each is positive and all sum to 1.
    weights: Vec<f64>,
    /// The component distributions
    components: Vec<Fx>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MixtureError {
    /// The weights vector is empty
    WeightsEmpty,
    /// The components vector is empty
    ComponentsEmpty,
    /// The weights and components vectors have different lengths
    ComponentWeightLengthMismatch {
        n_weights: usize,
        n_components: usize,
    },
    /// A weight is negative, zero, or non-finite
    WeightTooLow { ix: usize, weight: f64 },
    /// The weights do not sum to 1
    WeightsDoNotSumToOne { weight_sum: f64 },
}

impl<Fx> Mixture<Fx> {
    /// Create a new mixture distribution
    ///
    /// # Arguments
    /// - weights: The weights for each component distribution. All entries
    ///   must be positive and sum to 1.
    /// - components: The component distributions.
    pub fn new(
        weights: Vec<f64>,
        components: Vec<Fx>,
    ) -> Result<Self, MixtureError> {
        if weights.is_empty() {
            Err(MixtureError::WeightsEmpty)
        } else if components.is_empty() {
            Err(MixtureError::ComponentsEmpty)
        } else if weights.len() != components.len() {
            Err(MixtureError::ComponentWeightLengthMismatch {
                n_weights: weights.len(),
                n_components: components.len(),
            })
        } else if let Some((ix, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, &w)| w <= 0.0 || !w.is_finite())
        {
            Err(MixtureError::WeightTooLow { ix, weight })
        } else {
            let weight_sum: f64 = weights.iter().sum();
            if (weight_sum - 1.0).abs() > 1E-9 {
                Err(MixtureError::WeightsDoNotSumToOne { weight_sum })
            } else {
                Ok(Mixture {
                    weights,
                    components,
                })
            }
        }
    }

    /// Creates a new mixture without checking whether the weights are valid
    #[inline]
    #[must_use]
    pub fn new_unchecked(weights: Vec<f64>, components: Vec<Fx>) -> Self {
        Mixture {
            weights,
            components,
        }
    }

    /// Create a uniform mixture: all component weights are 1/k
    ///
    /// # Example
    ///
    /// ```
    /// use mixfit::dist::{Gaussian, Mixture};
    ///
    /// let mm = Mixture::uniform(vec![
    ///     Gaussian::standard(),
    ///     Gaussian::new(1.0, 2.0).unwrap(),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(mm.weights(), &[0.5, 0.5]);
    /// ```
    pub fn uniform(components: Vec<Fx>) -> Result<Self, MixtureError> {
        if components.is_empty() {
            Err(MixtureError::ComponentsEmpty)
        } else {
            let k = components.len();
            let weights = vec![1.0 / k as f64; k];
            Ok(Mixture {
                weights,
                components,
            })
        }
    }

    /// Number of components
    #[inline]
    #[must_use]
    pub fn k(&self) -> usize {
        self.components.len()
    }

    /// Get a reference to the mixing weights
    #[inline]
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Get a reference to the component distributions
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[Fx] {
        &self.components
    }
}

impl<X, Fx> HasDensity<X> for Mixture<Fx>
where
    Fx: HasDensity<X>,
{
    fn ln_f(&self, x: &X) -> f64 {
        self.weights
            .iter()
            .zip(self.components.iter())
            .map(|(&w, cpnt)| w.ln() + cpnt.ln_f(x))
            .logsumexp()
    }

    fn f(&self, x: &X) -> f64 {
        self.weights
            .iter()
            .zip(self.components.iter())
            .fold(0.0, |acc, (&w, cpnt)| w.mul_add(cpnt.f(x), acc))
    }
}

impl<X, Fx> Sampleable<X> for Mixture<Fx>
where
    Fx: Sampleable<X>,
{
    fn draw<R: Rng>(&self, mut rng: &mut R) -> X {
        let k: usize = pflip(&self.weights, 1, &mut rng)[0];
        self.components[k].draw(&mut rng)
    }

    fn sample<R: Rng>(&self, n: usize, mut rng: &mut R) -> Vec<X> {
        pflip(&self.weights, n, &mut rng)
            .iter()
            .map(|&k| self.components[k].draw(&mut rng))
            .collect()
    }
}

impl<X, Fx> Support<X> for Mixture<Fx>
where
    Fx: Support<X>,
{
    fn supports(&self, x: &X) -> bool {
        self.components.iter().any(|cpnt| cpnt.supports(x))
    }
}

impl<X, Fx> ContinuousDistr<X> for Mixture<Fx> where Fx: ContinuousDistr<X> {}

impl<Fx> Mean<f64> for Mixture<Fx>
where
    Fx: Mean<f64>,
{
    fn mean(&self) -> Option<f64> {
        self.weights
            .iter()
            .zip(self.components.iter())
            .try_fold(0.0, |acc, (&w, cpnt)| {
                cpnt.mean().map(|m| w.mul_add(m, acc))
            })
    }
}

impl<Fx> Variance<f64> for Mixture<Fx>
where
    Fx: Mean<f64> + Variance<f64>,
{
    /// Var(x) = E[x²] - E[x]², where E[x²] = Σₖ wₖ (σₖ² + μₖ²)
    fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        self.weights
            .iter()
            .zip(self.components.iter())
            .try_fold(-mean * mean, |acc, (&w, cpnt)| {
                let m = cpnt.mean()?;
                let v = cpnt.variance()?;
                Some(w.mul_add(m.mul_add(m, v), acc))
            })
    }
}

impl std::error::Error for MixtureError {}

impl fmt::Display for MixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightsEmpty => write!(f, "empty weights vector"),
            Self::ComponentsEmpty => write!(f, "empty components vector"),
            Self::ComponentWeightLengthMismatch {
                n_weights,
                n_components,
            } => write!(
                f,
                "weights and components have different lengths: {n_weights} \
                 weights but {n_components} components"
            ),
            Self::WeightTooLow { ix, weight } => {
                write!(f, "weight at index {ix} ({weight}) is not positive")
            }
            Self::WeightsDoNotSumToOne { weight_sum } => {
                write!(f, "weights sum to {weight_sum}, not 1")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::Gaussian;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    const TOL: f64 = 1E-12;

    fn bimodal() -> Mixture<Gaussian> {
        Mixture::new(
            vec![0.3, 0.7],
            vec![
                Gaussian::new(-2.0, 1.0).unwrap(),
                Gaussian::new(3.0, 0.5).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_should_accept_simplex_weights() {
        assert!(Mixture::new(
            vec![0.5, 0.5],
            vec![Gaussian::standard(), Gaussian::standard()],
        )
        .is_ok());
    }

    #[test]
    fn new_should_reject_weights_that_do_not_sum_to_one() {
        let res = Mixture::new(
            vec![0.5, 0.6],
            vec![Gaussian::standard(), Gaussian::standard()],
        );
        match res {
            Err(MixtureError::WeightsDoNotSumToOne { weight_sum }) => {
                assert::close(weight_sum, 1.1, TOL)
            }
            _ => panic!("wrong result"),
        }
    }

    #[test]
    fn new_should_reject_non_positive_weights() {
        let res = Mixture::new(
            vec![1.0, 0.0],
            vec![Gaussian::standard(), Gaussian::standard()],
        );
        assert_eq!(
            res.unwrap_err(),
            MixtureError::WeightTooLow {
                ix: 1,
                weight: 0.0
            }
        );
    }

    #[test]
    fn new_should_reject_mismatched_lengths() {
        let res = Mixture::new(vec![0.5, 0.5], vec![Gaussian::standard()]);
        assert_eq!(
            res.unwrap_err(),
            MixtureError::ComponentWeightLengthMismatch {
                n_weights: 2,
                n_components: 1
            }
        );
    }

    #[test]
    fn new_should_reject_empty_inputs() {
        let res: Result<Mixture<Gaussian>, _> = Mixture::new(vec![], vec![]);
        assert_eq!(res.unwrap_err(), MixtureError::WeightsEmpty);

        let res = Mixture::uniform(Vec::<Gaussian>::new());
        assert_eq!(res.unwrap_err(), MixtureError::ComponentsEmpty);
    }

    #[test]
    fn uniform_weights() {
        let mm = Mixture::uniform(vec![
            Gaussian::standard(),
            Gaussian::standard(),
            Gaussian::standard(),
            Gaussian::standard(),
        ])
        .unwrap();
        assert_eq!(mm.k(), 4);
        mm.weights().iter().for_each(|&w| {
            assert::close(w, 0.25, TOL);
        });
    }

    #[test]
    fn ln_f_agrees_with_weighted_density_sum() {
        let mm = bimodal();
        for x in [-3.0_f64, -0.5, 0.0, 2.9, 10.2] {
            let direct: f64 = mm
                .weights()
                .iter()
                .zip(mm.components().iter())
                .map(|(&w, cpnt)| w * cpnt.f(&x))
                .sum();
            assert::close(mm.ln_f(&x), direct.ln(), 1E-10);
        }
    }

    #[test]
    fn mean_is_weighted_average_of_component_means() {
        let mm = bimodal();
        assert::close(mm.mean().unwrap(), 0.3 * (-2.0) + 0.7 * 3.0, TOL);
    }

    #[test]
    fn variance_of_single_component_mixture_is_component_variance() {
        let mm =
            Mixture::new(vec![1.0], vec![Gaussian::new(1.3, 2.0).unwrap()])
                .unwrap();
        assert::close(mm.variance().unwrap(), 4.0, 1E-10);
    }

    #[test]
    fn variance_spreads_with_separated_means() {
        // Two unit-variance components 4 apart: Var = 1 + E[μ²] - E[μ]² = 5
        let mm = Mixture::uniform(vec![
            Gaussian::new(-2.0, 1.0).unwrap(),
            Gaussian::new(2.0, 1.0).unwrap(),
        ])
        .unwrap();
        assert::close(mm.variance().unwrap(), 5.0, 1E-10);
    }

    #[test]
    fn sample_returns_the_correct_number_of_draws() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0xABCD);
        let mm = bimodal();
        let xs: Vec<f64> = mm.sample(103, &mut rng);
        assert_eq!(xs.len(), 103);
    }

    #[test]
    fn draws_land_near_both_modes() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0xABCD);
        let mm = bimodal();
        let xs: Vec<f64> = mm.sample(1000, &mut rng);
        assert!(xs.iter().any(|&x| x < 0.0));
        assert!(xs.iter().any(|&x| x > 0.0));
    }

    #[test]
    fn supports_finite_values_only() {
        let mm = bimodal();
        assert!(mm.supports(&0.0_f64));
        assert!(!mm.supports(&f64::NAN));
    }
}
