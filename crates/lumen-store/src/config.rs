/// Store tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of undo steps kept; the oldest are evicted first.
    pub history_depth: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { history_depth: 200 }
    }
}

impl StoreConfig {
    pub fn new(history_depth: usize) -> Self {
        Self { history_depth }
    }

    pub fn unlimited() -> Self {
        Self {
            history_depth: usize::MAX,
        }
    }
}
