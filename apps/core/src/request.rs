use serde::Serialize;
use std::fmt;

/// Kinds of in-flight work that follow "latest request wins".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequestKind {
    Fetch,
    Geocode,
    Route,
}

impl RequestKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Geocode => "geocode",
            Self::Route => "route",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Fetch => 0,
            Self::Geocode => 1,
            Self::Route => 2,
        }
    }
}

/// Identifies one request; only the newest ticket of each kind is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Ticket {
    pub kind: RequestKind,
    pub serial: u64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind.as_str(), self.serial)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: [u64; 3],
}

impl RequestTracker {
    pub const fn new() -> Self {
        Self { latest: [0; 3] }
    }

    /// Issues a new ticket, superseding any earlier one of the same kind.
    pub fn issue(&mut self, kind: RequestKind) -> Ticket {
        let slot = &mut self.latest[kind.index()];
        *slot += 1;
        Ticket {
            kind,
            serial: *slot,
        }
    }

    pub const fn is_current(&self, ticket: Ticket) -> bool {
        self.latest[ticket.kind.index()] == ticket.serial
    }

    /// Invalidates whatever is in flight for `kind`.
    pub fn cancel(&mut self, kind: RequestKind) {
        self.latest[kind.index()] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_ticket_wins() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue(RequestKind::Geocode);
        let second = tracker.issue(RequestKind::Geocode);

        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn kinds_are_independent() {
        let mut tracker = RequestTracker::new();
        let fetch = tracker.issue(RequestKind::Fetch);
        let route = tracker.issue(RequestKind::Route);
        tracker.issue(RequestKind::Geocode);

        assert!(tracker.is_current(fetch));
        assert!(tracker.is_current(route));
    }

    #[test]
    fn cancel_invalidates_in_flight_ticket() {
        let mut tracker = RequestTracker::new();
        let route = tracker.issue(RequestKind::Route);
        tracker.cancel(RequestKind::Route);

        assert!(!tracker.is_current(route));
        assert_eq!(route.to_string(), "route#1");
    }
}
