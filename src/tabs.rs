//! Tab/window activity registry.
//!
//! Lets the consumer ask whether the tab a request originated from is still
//! alive. Membership-based: the embedding application registers tabs as they
//! open and removes them as they close.

use dashmap::DashSet;
use tracing::debug;

/// Thread-safe set of currently open tab ids
#[derive(Debug, Default)]
pub struct TabRegistry {
    tabs: DashSet<i64>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab_opened(&self, tab_id: i64) {
        if self.tabs.insert(tab_id) {
            debug!(tab_id, "tab registered");
        }
    }

    pub fn tab_closed(&self, tab_id: i64) {
        if self.tabs.remove(&tab_id).is_some() {
            debug!(tab_id, "tab unregistered");
        }
    }

    /// Whether the window behind `tab_id` is still open
    pub fn is_window_active(&self, tab_id: i64) -> bool {
        self.tabs.contains(&tab_id)
    }

    pub fn active_count(&self) -> usize {
        self.tabs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let registry = TabRegistry::new();
        assert!(!registry.is_window_active(1));

        registry.tab_opened(1);
        registry.tab_opened(2);
        assert!(registry.is_window_active(1));
        assert_eq!(registry.active_count(), 2);

        registry.tab_closed(1);
        assert!(!registry.is_window_active(1));
        assert!(registry.is_window_active(2));
    }

    #[test]
    fn close_of_unknown_tab_is_a_noop() {
        let registry = TabRegistry::new();
        registry.tab_closed(99);
        assert_eq!(registry.active_count(), 0);
    }
}
