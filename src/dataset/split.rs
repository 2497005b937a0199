use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};

/// Row indices for the two halves of a train/test split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded RNG and hold out `ceil(n * test_fraction)` rows.
///
/// Both sides keep at least one row whenever `n >= 2`.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<Split, String> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(format!(
            "Test fraction must be between 0 and 1 (got {test_fraction})"
        ));
    }
    if n < 2 {
        return Err(format!("Need at least 2 rows to split (got {n})"));
    }
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = (n as f64 * test_fraction).ceil() as usize;
    let n_test = n_test.clamp(1, n - 1);
    let train = indices.split_off(n_test);
    Ok(Split {
        train,
        test: indices,
    })
}
