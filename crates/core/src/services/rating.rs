//! Derived title rating.
//!
//! Ratings are never stored. They are computed from the current review
//! scores at read time, so deleting or editing a review is reflected
//! immediately without bookkeeping hooks.

/// Mean of the given review scores, rounded half-to-even at two decimals.
///
/// Returns `None` when the title has no reviews, which serializes as a null
/// rating rather than zero.
#[must_use]
pub fn rating_of(scores: &[i16]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }

    let sum: i64 = scores.iter().map(|s| i64::from(*s)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum as f64 / scores.len() as f64;

    Some((mean * 100.0).round_ties_even() / 100.0)
}
