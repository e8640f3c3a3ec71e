//! Daily slot allocation across content categories.
//!
//! `vocab_slots = floor(capacity * vocab_ratio)` and
//! `grammar_slots = capacity - vocab_slots`, so the two always sum to
//! exactly `capacity`. No cross-category backfill: a pool short of its slot
//! count leaves those slots empty.

use std::cmp::Ordering;

use crate::types::Candidate;

fn score_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

/// Normalizes the two ratios to sum 1.0, falling back to an even split when
/// both are zero or invalid.
pub fn normalize_ratios(vocab_ratio: f64, grammar_ratio: f64) -> (f64, f64) {
    let vocab = if vocab_ratio.is_finite() && vocab_ratio > 0.0 {
        vocab_ratio
    } else {
        0.0
    };
    let grammar = if grammar_ratio.is_finite() && grammar_ratio > 0.0 {
        grammar_ratio
    } else {
        0.0
    };
    let total = vocab + grammar;
    if total <= 0.0 {
        return (0.5, 0.5);
    }
    (vocab / total, grammar / total)
}

/// Slot counts for a capacity under normalized ratios. The sum is exactly
/// `capacity` for any input.
pub fn split_slots(capacity: usize, vocab_ratio: f64, grammar_ratio: f64) -> (usize, usize) {
    let (vocab_ratio, _) = normalize_ratios(vocab_ratio, grammar_ratio);
    let vocab_slots = ((capacity as f64) * vocab_ratio).floor() as usize;
    let vocab_slots = vocab_slots.min(capacity);
    (vocab_slots, capacity - vocab_slots)
}

/// Takes the top of each already-sorted pool, merges, and re-sorts the
/// combined set by calibrated score.
pub fn allocate(
    vocab_ranked: Vec<Candidate>,
    grammar_ranked: Vec<Candidate>,
    capacity: usize,
    vocab_ratio: f64,
    grammar_ratio: f64,
) -> Vec<Candidate> {
    let (vocab_slots, grammar_slots) = split_slots(capacity, vocab_ratio, grammar_ratio);

    let mut combined: Vec<Candidate> = vocab_ranked
        .into_iter()
        .take(vocab_slots)
        .chain(grammar_ranked.into_iter().take(grammar_slots))
        .collect();
    combined.sort_by(score_desc);
    combined
}
