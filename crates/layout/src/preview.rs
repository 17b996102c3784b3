//! Ordering for drag previews whose validation may finish out of order.
//!
//! Every pointer move takes a ticket. A result is shown only if its ticket is
//! newer than the one currently on screen, so a slow validation issued by an
//! older move can never overwrite a newer preview (last-issued wins, not
//! last-resolved).

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreviewTicket(u64);

#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewGate {
    issued: u64,
    shown: u64,
}

impl PreviewGate {
    pub fn issue(&mut self) -> PreviewTicket {
        self.issued += 1;
        PreviewTicket(self.issued)
    }

    /// Claim the screen for `ticket`. Returns false for stale or revoked
    /// tickets.
    pub fn accept(&mut self, ticket: PreviewTicket) -> bool {
        if ticket.0 <= self.shown || ticket.0 > self.issued {
            return false;
        }
        self.shown = ticket.0;
        true
    }

    /// Revoke every ticket issued so far.
    pub fn invalidate(&mut self) {
        self.shown = self.issued;
    }

    #[cfg(test)]
    fn in_flight(&self) -> u64 {
        self.issued - self.shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_order_results_are_all_shown() {
        let mut gate = PreviewGate::default();
        let a = gate.issue();
        assert!(gate.accept(a));
        let b = gate.issue();
        assert!(gate.accept(b));
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_older_result_resolving_late_is_dropped() {
        let mut gate = PreviewGate::default();
        let older = gate.issue();
        let newer = gate.issue();
        assert!(gate.accept(newer));
        assert!(!gate.accept(older));
    }

    #[test]
    fn test_older_result_resolving_first_is_shown_then_superseded() {
        let mut gate = PreviewGate::default();
        let older = gate.issue();
        let newer = gate.issue();
        assert_eq!(gate.in_flight(), 2);
        assert!(gate.accept(older));
        assert!(gate.accept(newer));
    }

    #[test]
    fn test_invalidate_revokes_outstanding_tickets() {
        let mut gate = PreviewGate::default();
        let pending = gate.issue();
        gate.invalidate();
        assert!(!gate.accept(pending));
        let fresh = gate.issue();
        assert!(gate.accept(fresh));
    }

    #[test]
    fn test_duplicate_accept_is_rejected() {
        let mut gate = PreviewGate::default();
        let t = gate.issue();
        assert!(gate.accept(t));
        assert!(!gate.accept(t));
    }
}
