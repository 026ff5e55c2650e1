//! Store configuration.

/// Tunables for a [`Store`](crate::Store).
///
/// ```
/// use tabulon_store::StoreConfig;
///
/// let config = StoreConfig::new().notify_on_noop(true).row_id_start(100);
/// assert!(config.notifies_on_noop());
/// assert_eq!(config.first_row_id(), 100);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreConfig {
    notify_on_noop: bool,
    max_notify_depth: Option<usize>,
    row_id_start: u64,
}

impl StoreConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, a write that leaves a table unchanged (an identical
    /// set, a delete of an absent row) still fires that table's listeners
    /// with an empty change set.
    pub fn notify_on_noop(mut self, value: bool) -> Self {
        self.notify_on_noop = value;
        self
    }

    /// Caps how deeply listener callbacks may trigger further dispatch.
    ///
    /// Unset by default: a listener that writes to the table it observes
    /// recurses without limit. When set, a write made at the cap still
    /// commits, but its whole dispatch is skipped and logged: no table, row
    /// or value listener hears of it, including listeners on other tables
    /// that never write back.
    pub fn max_notify_depth(mut self, depth: usize) -> Self {
        self.max_notify_depth = Some(depth);
        self
    }

    /// First counter value used by generated row ids.
    pub fn row_id_start(mut self, start: u64) -> Self {
        self.row_id_start = start;
        self
    }

    /// Returns whether no-op writes notify.
    #[inline]
    pub fn notifies_on_noop(&self) -> bool {
        self.notify_on_noop
    }

    /// Returns the dispatch depth cap, if any.
    #[inline]
    pub fn notify_depth_limit(&self) -> Option<usize> {
        self.max_notify_depth
    }

    /// Returns the first generated row id counter value.
    #[inline]
    pub fn first_row_id(&self) -> u64 {
        self.row_id_start
    }
}
