use rand::Rng;
use skyline_common::ConfigError;

/// Draw one option, with each option repeated `weights[i]` times in the pool.
///
/// The pool is rebuilt on every call; use [`WeightSpec`] when the same
/// weights are sampled repeatedly.
pub fn sample<'a, T, R: Rng + ?Sized>(
    options: &'a [T],
    weights: &[u32],
    rng: &mut R,
) -> Result<&'a T, ConfigError> {
    let pool = build_pool("weight spec", options.len(), weights)?;
    Ok(&options[pool[rng.random_range(0..pool.len())]])
}

/// Parse a space-separated weight string such as `"1 2 3 0"`.
pub fn parse_weights(text: &str) -> Result<Vec<u32>, ConfigError> {
    text.split_whitespace()
        .map(|token| {
            token.parse::<u32>().map_err(|_| ConfigError::InvalidWeight {
                token: token.to_string(),
            })
        })
        .collect()
}

/// A validated option/weight table that can be sampled many times.
#[derive(Debug, Clone)]
pub struct WeightSpec<T> {
    options: Vec<T>,
    weights: Vec<u32>,
    /// Option indices, each repeated by its weight, in input order.
    pool: Vec<usize>,
}

impl<T> WeightSpec<T> {
    pub fn new(options: Vec<T>, weights: Vec<u32>) -> Result<Self, ConfigError> {
        Self::labelled("weight spec", options, weights)
    }

    /// Like [`WeightSpec::new`], with `what` naming the table in errors.
    pub fn labelled(
        what: &'static str,
        options: Vec<T>,
        weights: Vec<u32>,
    ) -> Result<Self, ConfigError> {
        let pool = build_pool(what, options.len(), &weights)?;
        Ok(Self {
            options,
            weights,
            pool,
        })
    }

    /// Draw one option. Every call is an independent draw.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.options[self.pool[rng.random_range(0..self.pool.len())]]
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    pub fn total_weight(&self) -> usize {
        self.pool.len()
    }

    /// Expected frequency of `options[index]`.
    pub fn probability(&self, index: usize) -> f64 {
        self.weights.get(index).copied().unwrap_or(0) as f64 / self.pool.len() as f64
    }
}

fn build_pool(what: &'static str, options: usize, weights: &[u32]) -> Result<Vec<usize>, ConfigError> {
    if options != weights.len() {
        return Err(ConfigError::LengthMismatch {
            what,
            options,
            weights: weights.len(),
        });
    }
    let pool: Vec<usize> = weights
        .iter()
        .enumerate()
        .flat_map(|(i, &w)| std::iter::repeat_n(i, w as usize))
        .collect();
    if pool.is_empty() {
        return Err(ConfigError::EmptyPool { what });
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_weight_options_are_never_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let options = ["arc", "flower", "sine"];
        for _ in 0..500 {
            let picked = sample(&options, &[0, 0, 1], &mut rng).unwrap();
            assert_eq!(*picked, "sine");
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = sample(&[1, 2, 3], &[1, 1], &mut rng).unwrap_err();
        assert_eq!(
            err,
            ConfigError::LengthMismatch {
                what: "weight spec",
                options: 3,
                weights: 2
            }
        );
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let err = WeightSpec::new(vec!['a', 'b'], vec![0, 0]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPool { .. }));
    }

    #[test]
    fn empirical_frequencies_follow_weights() {
        let spec = WeightSpec::new(vec![0usize, 1, 2, 3], vec![1, 2, 3, 0]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let draws = 60_000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            counts[*spec.sample(&mut rng)] += 1;
        }
        for (i, &count) in counts.iter().enumerate() {
            let observed = count as f64 / draws as f64;
            assert!(
                (observed - spec.probability(i)).abs() < 0.01,
                "option {i}: observed {observed}, expected {}",
                spec.probability(i)
            );
        }
        assert_eq!(counts[3], 0);
    }

    #[test]
    fn pool_preserves_input_order() {
        let spec = WeightSpec::new(vec!['a', 'b', 'c'], vec![1, 2, 3]).unwrap();
        assert_eq!(spec.pool, vec![0, 1, 1, 2, 2, 2]);
        assert_eq!(spec.total_weight(), 6);
    }

    #[test]
    fn parses_space_separated_weights() {
        assert_eq!(parse_weights("1 2  3 0").unwrap(), vec![1, 2, 3, 0]);
        assert!(parse_weights("").unwrap().is_empty());
        assert_eq!(
            parse_weights("1 x").unwrap_err(),
            ConfigError::InvalidWeight { token: "x".into() }
        );
    }
}
