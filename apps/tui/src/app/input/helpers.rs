/// Moves a list cursor by `delta` rows, stopping at either end.
pub fn step_clamped(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}
