//! Monotonic request sequencing.
//!
//! Every refresh takes a [`Ticket`] before it starts. When its response
//! arrives, the result may only be applied if no newer ticket was issued in
//! the meantime; otherwise a more recent request is in flight and this
//! response is stale, regardless of completion order.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

/// Position of one request in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket. Tickets start at 1.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the most recently issued one.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}
