use gpui::{Bounds, Pixels, ScrollStrategy};
use gpui_component::VirtualListScrollHandle;

/// Holds the list scroll handle and scroll requests made between frames.
///
/// Requests are applied on the next render, after the virtual list has seen
/// the rows they refer to.
pub struct ScrollManager {
    scroll_handle: VirtualListScrollHandle,
    pending_row: Option<usize>,
}

impl ScrollManager {
    pub fn new() -> Self {
        Self {
            scroll_handle: VirtualListScrollHandle::new(),
            pending_row: None,
        }
    }

    pub fn handle(&self) -> &VirtualListScrollHandle {
        &self.scroll_handle
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending_row.is_some()
    }

    /// Queues a scroll that brings `row` to the bottom edge.
    pub fn request_scroll_to_row(&mut self, row: usize) {
        self.pending_row = Some(row);
    }

    /// Drops a queued request whose row no longer exists.
    pub fn discard_out_of_range(&mut self, row_count: usize) {
        if self.pending_row.is_some_and(|row| row >= row_count) {
            self.pending_row = None;
        }
    }

    pub fn apply_pending_scroll(&mut self) -> bool {
        let Some(row) = self.pending_row.take() else {
            return false;
        };

        self.scroll_handle.scroll_to_item(row, ScrollStrategy::Bottom);
        true
    }

    pub fn bounds(&self) -> Bounds<Pixels> {
        self.scroll_handle.bounds()
    }
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_request_wins_and_is_applied_once() {
        let mut manager = ScrollManager::new();
        manager.request_scroll_to_row(2);
        manager.request_scroll_to_row(5);

        assert!(manager.has_pending_scroll());
        assert!(manager.apply_pending_scroll());
        assert!(!manager.has_pending_scroll());
        assert!(!manager.apply_pending_scroll());
    }

    #[test]
    fn requests_past_the_end_are_discarded() {
        let mut manager = ScrollManager::new();
        manager.request_scroll_to_row(3);

        manager.discard_out_of_range(4);
        assert!(manager.has_pending_scroll());

        manager.discard_out_of_range(3);
        assert!(!manager.has_pending_scroll());
    }
}
