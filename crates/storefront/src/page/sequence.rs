//! Per-slot request sequencing.
//!
//! Every logical slot (catalog load, selected user, try-on) owns a
//! [`Sequencer`]. Starting an operation takes a [`Ticket`]; when the response
//! arrives it is applied only if the ticket is still the slot's latest.

/// Monotonic tag handed out when an operation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Issues tickets for one slot.
#[derive(Debug, Default)]
pub struct Sequencer {
    latest: u64,
}

impl Sequencer {
    /// Start a new operation, superseding all earlier tickets.
    pub const fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Returns true if `ticket` belongs to the most recent operation.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}
