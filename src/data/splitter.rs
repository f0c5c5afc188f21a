// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles rows with a seeded RNG and splits them into:
//   - Training set:   used to update model weights
//   - Validation set: used to measure performance on unseen data
//
// The corpus is ordered platform-by-platform and topic-by-topic,
// so without shuffling the validation set would hold a single
// topic. The shuffle is seeded so the same configuration always
// produces the same split, which makes runs reproducible and
// validation comparable across them.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `rows` with the given seed and split into (train, validation).
///
/// # Arguments
/// * `rows`           - All available rows (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `seed`           - RNG seed; same seed means same split
pub fn split_train_val<T>(
    mut rows: Vec<T>,
    train_fraction: f64,
    seed: u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);

    // Fisher-Yates shuffle — every permutation is equally likely
    rows.shuffle(&mut rng);

    // e.g. 100 rows * 0.8 = 80 → first 80 are training
    let total    = rows.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] and returns them
    let val = rows.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation",
        rows.len(),
        val.len(),
    );

    (rows, val)
}
