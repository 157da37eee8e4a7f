//! Narration word budget derived from video duration.

/// Average narration speed in words per second.
pub const WORDS_PER_SECOND: f64 = 2.2;
/// Fraction of the raw budget held back so narration never overruns.
pub const SAFETY_MARGIN: f64 = 0.15;
pub const MIN_WORD_BUDGET: u64 = 5;

/// Maps a duration to a word budget. The caller guarantees a finite,
/// non-negative duration.
pub fn compute_word_budget(duration_seconds: f64) -> u64 {
    let raw = (duration_seconds * WORDS_PER_SECOND).floor();
    let safe = (raw * (1.0 - SAFETY_MARGIN)).floor() as u64;
    safe.max(MIN_WORD_BUDGET)
}
