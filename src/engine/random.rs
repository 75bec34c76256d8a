//! Injectable randomness.

use std::ops::Range;

/// A source of uniformly distributed indices.
///
/// Every `rand::Rng` is a `RandomSource`, so the host passes `rand::rng()`
/// while tests pass a scripted sequence.
pub trait RandomSource {
    /// Returns a value in `range`. Callers never pass an empty range.
    fn next(&mut self, range: Range<usize>) -> usize;
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn next(&mut self, range: Range<usize>) -> usize {
        self.random_range(range)
    }
}

/// Replays a fixed list of offsets; each one is reduced into the requested range.
#[cfg(test)]
pub(crate) struct ScriptedRandom {
    values: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(values: impl IntoIterator<Item = usize>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next(&mut self, range: Range<usize>) -> usize {
        let offset = self.values.pop_front().unwrap_or(0);
        range.start + offset % range.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let value = RandomSource::next(&mut rng, 3..9);
            assert!((3..9).contains(&value));
        }
    }

    #[test]
    fn test_scripted_wraps_offsets() {
        let mut rng = ScriptedRandom::new([0, 4, 7]);
        assert_eq!(rng.next(10..13), 10);
        assert_eq!(rng.next(10..13), 11);
        assert_eq!(rng.next(0..5), 2);
        // Exhausted scripts fall back to the start of the range.
        assert_eq!(rng.next(2..4), 2);
    }
}
