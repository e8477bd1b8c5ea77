//! Change notifications for views displaying the history.

use std::sync::mpsc::{Receiver, Sender, channel};

/// What caused a history update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateReason {
    Recorded,
    Navigated,
    /// A row was picked in the list; views keep their scroll position.
    Selected,
    Pruned,
    Reloaded,
    Cleared,
    LockChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryUpdate {
    pub location: usize,
    pub reason: UpdateReason,
}

impl HistoryUpdate {
    pub fn should_scroll(&self) -> bool {
        self.reason != UpdateReason::Selected
    }
}

/// Fan-out of updates to any number of receivers.
#[derive(Debug, Default)]
pub(crate) struct UpdateBroadcaster {
    subscribers: Vec<Sender<HistoryUpdate>>,
}

impl UpdateBroadcaster {
    pub(crate) fn subscribe(&mut self) -> Receiver<HistoryUpdate> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every live receiver, forgetting disconnected ones.
    pub(crate) fn send(&mut self, update: HistoryUpdate) {
        self.subscribers.retain(|tx| tx.send(update).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
