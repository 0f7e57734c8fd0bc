// Mount/unmount bookkeeping shared by every view.
//
// Each view allows one outstanding fetch and one outstanding save. Starting
// a request hands out a `Ticket`; a result is only applied when its ticket
// is still current. A save invalidates any in-flight fetch, a newer save
// invalidates an older one, and unmounting invalidates everything and
// fires the cancellation token.

use tokio_util::sync::CancellationToken;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TicketKind {
    Fetch,
    Save,
}

/// Proof that a request was started; required to apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket must be handed back to apply the request's result"]
pub struct Ticket {
    kind: TicketKind,
    generation: u64,
}

#[derive(Debug)]
pub(crate) struct ViewLifecycle {
    fetch_generation: u64,
    save_generation: u64,
    cancel: CancellationToken,
}

impl Default for ViewLifecycle {
    fn default() -> Self {
        Self {
            fetch_generation: 0,
            save_generation: 0,
            cancel: CancellationToken::new(),
        }
    }
}

impl ViewLifecycle {
    pub(crate) fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    pub(crate) fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub(crate) fn start_fetch(&mut self) -> Ticket {
        self.fetch_generation += 1;
        trace!(generation = self.fetch_generation, "fetch started");
        Ticket {
            kind: TicketKind::Fetch,
            generation: self.fetch_generation,
        }
    }

    /// Start a save. Any fetch still in flight is superseded.
    pub(crate) fn start_save(&mut self) -> Ticket {
        self.fetch_generation += 1;
        self.save_generation += 1;
        trace!(generation = self.save_generation, "save started");
        Ticket {
            kind: TicketKind::Save,
            generation: self.save_generation,
        }
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        if !self.is_mounted() {
            return false;
        }
        match ticket.kind {
            TicketKind::Fetch => ticket.generation == self.fetch_generation,
            TicketKind::Save => ticket.generation == self.save_generation,
        }
    }

    pub(crate) fn unmount(&mut self) {
        self.fetch_generation += 1;
        self.save_generation += 1;
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_supersedes_fetch() {
        let mut lifecycle = ViewLifecycle::default();
        let fetch = lifecycle.start_fetch();
        let save = lifecycle.start_save();
        assert!(!lifecycle.is_current(fetch));
        assert!(lifecycle.is_current(save));
    }

    #[test]
    fn fetch_does_not_supersede_save() {
        let mut lifecycle = ViewLifecycle::default();
        let save = lifecycle.start_save();
        let fetch = lifecycle.start_fetch();
        assert!(lifecycle.is_current(save));
        assert!(lifecycle.is_current(fetch));
    }

    #[test]
    fn unmount_invalidates_everything() {
        let mut lifecycle = ViewLifecycle::default();
        let fetch = lifecycle.start_fetch();
        let save = lifecycle.start_save();
        let token = lifecycle.cancel_token();

        lifecycle.unmount();
        assert!(!lifecycle.is_mounted());
        assert!(token.is_cancelled());
        assert!(!lifecycle.is_current(fetch));
        assert!(!lifecycle.is_current(save));
    }
}
