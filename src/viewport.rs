/// Viewport reactor.
///
/// Maps the container width to a row size and collapses bursts of resize
/// events into one re-layout. The reactor only decides *when*; the layout
/// session does the work with the records it already has.

use std::time::Duration;

/// Containers narrower than this show two images per row
pub const SMALL_SCREEN_BREAKPOINT: f32 = 768.0;

/// Quiet period after the last resize before re-laying out
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Images per row for a container width
pub fn images_per_row(width: f32) -> usize {
    if width < SMALL_SCREEN_BREAKPOINT {
        2
    } else {
        3
    }
}

/// Identifies one scheduled re-layout; only the latest one fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTicket(u64);

#[derive(Debug, Clone)]
pub struct ViewportReactor {
    installed: bool,
    width: f32,
    latest: u64,
    pending: bool,
}

impl ViewportReactor {
    pub fn new(initial_width: f32) -> Self {
        Self {
            installed: false,
            width: initial_width,
            latest: 0,
            pending: false,
        }
    }

    /// Start listening. Returns true only the first time.
    pub fn install(&mut self) -> bool {
        !std::mem::replace(&mut self.installed, true)
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Last observed width
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn images_per_row(&self) -> usize {
        images_per_row(self.width)
    }

    /// Record a resize. Returns a ticket to settle after `RESIZE_DEBOUNCE`,
    /// or None when the width did not change or the reactor is not listening.
    pub fn on_resize(&mut self, width: f32) -> Option<ResizeTicket> {
        if !self.installed || width == self.width {
            return None;
        }

        self.width = width;
        self.latest += 1;
        self.pending = true;
        Some(ResizeTicket(self.latest))
    }

    /// Called when a ticket's quiet period is over. Yields the settled width
    /// if no newer resize arrived meanwhile; each burst settles once.
    pub fn settle(&mut self, ticket: ResizeTicket) -> Option<f32> {
        if ticket.0 != self.latest || !self.pending {
            return None;
        }

        self.pending = false;
        Some(self.width)
    }

    /// Wait out the quiet period for a ticket
    pub async fn quiet_period(ticket: ResizeTicket) -> ResizeTicket {
        tokio::time::sleep(RESIZE_DEBOUNCE).await;
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;

    #[test]
    fn test_breakpoint() {
        assert_eq!(images_per_row(500.0), 2);
        assert_eq!(images_per_row(767.9), 2);
        assert_eq!(images_per_row(768.0), 3);
        assert_eq!(images_per_row(1024.0), 3);
    }

    #[test]
    fn test_install_is_idempotent() {
        let mut reactor = ViewportReactor::new(1024.0);
        assert!(reactor.install());
        assert!(!reactor.install());
        assert!(reactor.is_installed());
    }

    #[test]
    fn test_ignored_until_installed() {
        let mut reactor = ViewportReactor::new(1024.0);
        assert_eq!(reactor.on_resize(600.0), None);
        assert_eq!(reactor.width(), 1024.0);
    }

    #[test]
    fn test_height_only_resize_ignored() {
        let mut reactor = ViewportReactor::new(1024.0);
        reactor.install();
        assert_eq!(reactor.on_resize(1024.0), None);
    }

    #[test]
    fn test_burst_settles_once_with_final_width() {
        let mut reactor = ViewportReactor::new(1200.0);
        reactor.install();

        let tickets: Vec<_> = [1100.0, 900.0, 700.0, 650.0]
            .iter()
            .filter_map(|&w| reactor.on_resize(w))
            .collect();
        assert_eq!(tickets.len(), 4);

        let settled: Vec<f32> = tickets.iter().filter_map(|&t| reactor.settle(t)).collect();
        assert_eq!(settled, vec![650.0]);
        assert_eq!(reactor.images_per_row(), 2);

        // A repeated delivery of the winning ticket does nothing
        assert_eq!(reactor.settle(tickets[3]), None);
    }

    #[tokio::test]
    async fn test_quiet_periods_collapse_to_one_relayout() {
        let mut reactor = ViewportReactor::new(1200.0);
        reactor.install();

        let tickets: Vec<_> = [1000.0, 800.0, 500.0]
            .iter()
            .filter_map(|&w| reactor.on_resize(w))
            .collect();

        let expired = join_all(tickets.into_iter().map(ViewportReactor::quiet_period)).await;
        let relayouts: Vec<f32> = expired.into_iter().filter_map(|t| reactor.settle(t)).collect();

        assert_eq!(relayouts, vec![500.0]);
    }
}
