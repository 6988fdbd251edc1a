use crate::utils::error::{MlopsError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `rows` with a seeded RNG and split off `ceil(test_size * n)` rows
/// as the test set. Returns `(train, test)`.
pub fn train_test_split<T: Clone>(rows: &[T], test_size: f64, seed: u64) -> Result<(Vec<T>, Vec<T>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MlopsError::InvalidConfigValueError {
            field: "data_transformation.test_size".to_string(),
            value: test_size.to_string(),
            reason: "Value must be strictly between 0 and 1".to_string(),
        });
    }

    let n = rows.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(MlopsError::ProcessingError {
            message: format!(
                "Cannot split {} rows with test_size {}: one side would be empty",
                n, test_size
            ),
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let train = train_idx.iter().map(|&i| rows[i].clone()).collect();
    let test = test_idx.iter().map(|&i| rows[i].clone()).collect();
    Ok((train, test))
}
