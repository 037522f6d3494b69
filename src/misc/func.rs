use rand::Rng;
use std::ops::AddAssign;

/// Safely compute `log(sum(exp(xs)))` over an iterator of log-domain values
///
/// The accumulation tracks the running maximum, so no intermediate
/// exponentiation can overflow. `NEG_INFINITY` entries contribute nothing;
/// an iterator of only `NEG_INFINITY` values sums to `NEG_INFINITY`.
///
/// # Example
///
/// ```
/// use mixfit::misc::LogSumExp;
///
/// let xs: Vec<f64> = vec![0.3_f64.ln(), 0.2_f64.ln(), 0.5_f64.ln()];
/// let lse = xs.iter().copied().logsumexp();
/// assert!(lse.abs() < 1E-12);
/// ```
pub trait LogSumExp: Iterator<Item = f64> + Sized {
    fn logsumexp(self) -> f64 {
        let (alpha, r) = self.fold((f64::NEG_INFINITY, 0.0_f64), |(alpha, r), x| {
            if x == f64::NEG_INFINITY {
                (alpha, r)
            } else if x <= alpha {
                (alpha, r + (x - alpha).exp())
            } else {
                (x, r.mul_add((alpha - x).exp(), 1.0))
            }
        });
        alpha + r.ln()
    }
}

impl<T> LogSumExp for T where T: Iterator<Item = f64> + Sized {}

/// Safely compute `log(sum(exp(xs)))`
///
/// # Panics
///
/// If `xs` is empty.
pub fn logsumexp(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        panic!("Empty container");
    } else if xs.len() == 1 {
        xs[0]
    } else {
        xs.iter().copied().logsumexp()
    }
}

/// Cumulative sum of `xs`
///
/// # Example
///
/// ```
/// # use mixfit::misc::cumsum;
/// let xs: Vec<i32> = vec![1, 1, 2, 1];
/// assert_eq!(cumsum(&xs), vec![1, 2, 4, 5]);
/// ```
pub fn cumsum<T>(xs: &[T]) -> Vec<T>
where
    T: AddAssign + Copy + Default,
{
    xs.iter()
        .scan(T::default(), |acc, &x| {
            *acc += x;
            Some(*acc)
        })
        .collect()
}

#[inline]
fn binary_search(cws: &[f64], r: f64) -> usize {
    let mut left: usize = 0;
    let mut right: usize = cws.len();
    while left < right {
        let mid = (left + right) / 2;
        if cws[mid] < r {
            left = mid + 1;
        } else {
            right = mid;
        }
    }
    left
}

#[inline]
fn catflip_bisection(cws: &[f64], r: f64) -> Option<usize> {
    let ix = binary_search(cws, r);
    if ix < cws.len() {
        Some(ix)
    } else {
        None
    }
}

#[inline]
fn catflip_standard(cws: &[f64], r: f64) -> Option<usize> {
    cws.iter().position(|&w| w > r)
}

fn catflip(cws: &[f64], r: f64) -> Option<usize> {
    if cws.len() > 9 {
        catflip_bisection(cws, r)
    } else {
        catflip_standard(cws, r)
    }
}

/// Draw `n` indices in proportion to their `weights`
///
/// # Panics
///
/// If `weights` is empty.
pub fn pflip(weights: &[f64], n: usize, rng: &mut impl Rng) -> Vec<usize> {
    if weights.is_empty() {
        panic!("Empty container");
    }
    let cws: Vec<f64> = cumsum(weights);
    let scale: f64 = *cws.last().unwrap();
    let u = rand::distributions::Uniform::new(0.0, 1.0);

    (0..n)
        .map(|_| {
            let r = rng.sample(u) * scale;
            match catflip(&cws, r) {
                Some(ix) => ix,
                None => {
                    let wsvec = weights.to_vec();
                    panic!("Could not draw from {:?}", wsvec)
                }
            }
        })
        .collect()
}
