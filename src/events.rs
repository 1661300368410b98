// SPDX-License-Identifier: MPL-2.0
//! Outbound event channel from the core to its host.
//!
//! Instead of hidden observer state, page changes flow through an explicit
//! queue the host drains. De-duplication is a filter stage on that queue:
//! consecutive identical pages never re-fire, whatever their reason.

use std::collections::VecDeque;

/// Why the current page changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChangeReason {
    /// Initial viewer configuration.
    Configuration,
    /// A wholesale reload of the media sequence.
    Load,
    /// The user tapped a thumbnail in the page-control bar.
    TapOnThumbnail,
    /// The page-control bar was scrolled and settled.
    ScrollingBar,
    /// An interactive paging transition finished.
    InteractivePaging,
}

/// One `page_did_change` notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub page: usize,
    pub reason: PageChangeReason,
}

/// De-duplicated FIFO of page-change events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    queue: VecDeque<PageChange>,
    last_page: Option<usize>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a page change unless it repeats the previously emitted page.
    ///
    /// Returns whether the event was actually enqueued.
    pub fn emit(&mut self, page: usize, reason: PageChangeReason) -> bool {
        if self.last_page == Some(page) {
            return false;
        }
        self.last_page = Some(page);
        self.queue.push_back(PageChange { page, reason });
        true
    }

    /// Pops the oldest pending event, if any.
    pub fn pop(&mut self) -> Option<PageChange> {
        self.queue.pop_front()
    }

    /// Drains every pending event in emission order.
    pub fn drain(&mut self) -> Vec<PageChange> {
        self.queue.drain(..).collect()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when no event is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Forgets the de-duplication history, e.g. across a reconfiguration.
    pub fn reset_dedup(&mut self) {
        self.last_page = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_in_order() {
        let mut events = EventQueue::new();
        assert!(events.emit(0, PageChangeReason::Configuration));
        assert!(events.emit(1, PageChangeReason::ScrollingBar));
        assert!(events.emit(2, PageChangeReason::InteractivePaging));

        let drained = events.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0].page, 0);
        assert_eq!(drained[2].reason, PageChangeReason::InteractivePaging);
        assert!(events.is_empty());
    }

    #[test]
    fn consecutive_identical_pages_do_not_refire() {
        let mut events = EventQueue::new();
        assert!(events.emit(3, PageChangeReason::TapOnThumbnail));
        assert!(!events.emit(3, PageChangeReason::ScrollingBar));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn same_page_refires_after_an_intervening_page() {
        let mut events = EventQueue::new();
        events.emit(3, PageChangeReason::TapOnThumbnail);
        events.emit(4, PageChangeReason::ScrollingBar);
        assert!(events.emit(3, PageChangeReason::ScrollingBar));
    }

    #[test]
    fn dedup_survives_draining() {
        let mut events = EventQueue::new();
        events.emit(1, PageChangeReason::Load);
        events.drain();
        // still the last emitted page even though the queue is empty
        assert!(!events.emit(1, PageChangeReason::ScrollingBar));
    }

    #[test]
    fn reset_dedup_allows_refire() {
        let mut events = EventQueue::new();
        events.emit(1, PageChangeReason::Load);
        events.reset_dedup();
        assert!(events.emit(1, PageChangeReason::Load));
    }
}
