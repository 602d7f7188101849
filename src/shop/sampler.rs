//! Unbiased sampling without replacement.

use crate::random::RandomSource;

/// In-place Fisher-Yates shuffle.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

/// Shuffles a copy of `pool` and takes up to `count` entries in shuffled
/// order, skipping anything `equals` to an entry of `exclude` or to an entry
/// already taken. Returns fewer than `count` when the pool runs dry.
pub fn sample_without_replacement<T, F, R>(
    pool: &[T],
    count: usize,
    equals: F,
    exclude: &[T],
    rng: &mut R,
) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
    R: RandomSource + ?Sized,
{
    let mut shuffled = pool.to_vec();
    shuffle(&mut shuffled, rng);

    let mut picked: Vec<T> = Vec::with_capacity(count.min(shuffled.len()));
    for candidate in shuffled {
        if picked.len() >= count {
            break;
        }
        let clashes = exclude.iter().any(|e| equals(e, &candidate))
            || picked.iter().any(|p| equals(p, &candidate));
        if !clashes {
            picked.push(candidate);
        }
    }
    picked
}
