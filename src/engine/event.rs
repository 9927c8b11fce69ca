//! Events published by a session.

use std::sync::mpsc;

use crate::catalog::Category;

/// Something the host UI may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Displayed loading percentage changed.
    Progress {
        /// Whole percent, 0 to 100.
        value: u32,
    },
    /// Loading stage text changed.
    Stage {
        /// Label text.
        label: String,
    },
    /// Loading reached 100. Sent once per session.
    Loaded,
    /// The picker switched category.
    CategoryChanged {
        /// Newly shown category.
        category: Category,
    },
    /// A variant was bound to its category.
    SelectionChanged {
        /// Category.
        category: Category,
        /// Selected variant index.
        index: usize,
    },
}

/// Sending half of the session's event channel. Sends to a receiver that
/// has gone away are dropped.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<EngineEvent>,
}

impl EventSender {
    /// New channel.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<EngineEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Publish `event`.
    pub fn send(&self, event: EngineEvent) {
        if self.tx.send(event).is_err() {
            log::trace!("event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_order() {
        let (tx, rx) = EventSender::channel();
        tx.send(EngineEvent::Progress { value: 3 });
        tx.send(EngineEvent::Loaded);
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, vec![EngineEvent::Progress { value: 3 }, EngineEvent::Loaded]);
    }

    #[test]
    fn send_after_receiver_drop_is_silent() {
        let (tx, rx) = EventSender::channel();
        drop(rx);
        tx.send(EngineEvent::Loaded);
    }
}
