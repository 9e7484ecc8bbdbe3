/// Background stage index for a score.
///
/// Each threshold the score has reached advances one stage; the result is
/// clamped to the last stage.
pub fn stage_for_score(score: u64, thresholds: &[u64], stage_count: usize) -> usize {
    let reached = thresholds.iter().filter(|&&t| score >= t).count();
    reached.min(stage_count.saturating_sub(1))
}

/// Number of speed ramps to apply when the score moves from `previous` to
/// `current`: one per multiple of `every` crossed.
///
/// With a +1 score step this fires exactly when `current % every == 0`.
pub fn ramp_crossings(previous: u64, current: u64, every: u64) -> u64 {
    if every == 0 || current <= previous {
        return 0;
    }
    current / every - previous / every
}
