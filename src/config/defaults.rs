/// Default number of entries kept in the history.
pub const DEFAULT_HISTORY_MAX: usize = 1024;
/// Upper bound accepted for `history_max`.
pub const MAX_HISTORY_LIMIT: usize = 16_384;

pub(super) fn clamp_history_max(value: usize) -> usize {
    value.clamp(1, MAX_HISTORY_LIMIT)
}

pub(super) fn default_history_max() -> usize {
    DEFAULT_HISTORY_MAX
}
