//! Trait definitions
use rand::Rng;

/// Types that have a density or mass function over values of type `X`
pub trait HasDensity<X> {
    /// Probability function
    ///
    /// # Example
    ///
    /// ```
    /// use mixfit::dist::Gaussian;
    /// use mixfit::traits::*;
    ///
    /// let gauss = Gaussian::standard();
    /// let f: f64 = gauss.f(&0.0_f64);
    /// assert!((f - 0.398_942_280_401_432_7).abs() < 1E-12);
    /// ```
    fn f(&self, x: &X) -> f64 {
        self.ln_f(x).exp()
    }

    /// Probability function, in log space
    fn ln_f(&self, x: &X) -> f64;
}

/// Types from which values of type `X` can be drawn
pub trait Sampleable<X> {
    /// Single draw
    fn draw<R: Rng>(&self, rng: &mut R) -> X;

    /// Multiple draws
    fn sample<R: Rng>(&self, n: usize, mut rng: &mut R) -> Vec<X> {
        (0..n).map(|_| self.draw(&mut rng)).collect()
    }

    /// Never-ending iterator of draws
    ///
    /// # Example
    ///
    /// ```
    /// use mixfit::dist::Gaussian;
    /// use mixfit::traits::*;
    ///
    /// let mut rng = rand::thread_rng();
    /// let gauss = Gaussian::standard();
    /// let xs: Vec<f64> = gauss.sample_stream(&mut rng).take(10).collect();
    /// assert_eq!(xs.len(), 10);
    /// ```
    fn sample_stream<'r, R: Rng>(
        &'r self,
        mut rng: &'r mut R,
    ) -> Box<dyn Iterator<Item = X> + 'r>
    where
        X: 'r,
        Self: Sized,
    {
        Box::new(std::iter::repeat_with(move || self.draw(&mut rng)))
    }
}

/// A random variable: a density over `X` that can also be sampled
pub trait Rv<X>: HasDensity<X> + Sampleable<X> {}

impl<X, T> Rv<X> for T where T: HasDensity<X> + Sampleable<X> {}

/// Identifies the support of a distribution
pub trait Support<X> {
    /// Returns `true` if `x` is in the support
    fn supports(&self, x: &X) -> bool;
}

/// Continuous probability distributions
pub trait ContinuousDistr<X>: Rv<X> + Support<X> {
    /// The value of the Probability Density Function (PDF) at `x`
    fn pdf(&self, x: &X) -> f64 {
        self.ln_pdf(x).exp()
    }

    /// The value of the log PDF at `x`
    fn ln_pdf(&self, x: &X) -> f64 {
        self.ln_f(x)
    }
}

/// Defines the mean
pub trait Mean<M> {
    /// Returns `None` if the mean is undefined
    fn mean(&self) -> Option<M>;
}

/// Defines the variance
pub trait Variance<V> {
    /// Returns `None` if the variance is undefined
    fn variance(&self) -> Option<V>;
}
