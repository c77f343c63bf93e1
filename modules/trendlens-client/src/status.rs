use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use trendlens_common::MockDataEvent;

const EVENT_CAPACITY: usize = 16;

/// Observable "the data on screen is synthetic" flag.
///
/// Owned by a client and handed to whoever renders; clones share the same
/// state. Writers race last-write-wins.
#[derive(Clone)]
pub struct MockDataStatus {
    state: Arc<watch::Sender<bool>>,
    events: broadcast::Sender<MockDataEvent>,
}

impl MockDataStatus {
    pub fn new(initial: bool) -> Self {
        let (state, _) = watch::channel(initial);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(state),
            events,
        }
    }

    pub fn get(&self) -> bool {
        *self.state.borrow()
    }

    /// Update the flag. Returns `true` and broadcasts only when the value changed.
    pub fn set(&self, using_mock_data: bool) -> bool {
        let changed = self.state.send_if_modified(|current| {
            if *current == using_mock_data {
                false
            } else {
                *current = using_mock_data;
                true
            }
        });
        if changed {
            tracing::info!(using_mock_data, "Mock data status changed");
            // No subscribers is fine.
            let _ = self.events.send(MockDataEvent { using_mock_data });
        }
        changed
    }

    /// Receiver that always holds the current value.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Stream of change events, one per transition.
    pub fn events(&self) -> broadcast::Receiver<MockDataEvent> {
        self.events.subscribe()
    }
}

impl Default for MockDataStatus {
    fn default() -> Self {
        Self::new(false)
    }
}

impl std::fmt::Debug for MockDataStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDataStatus")
            .field("using_mock_data", &self.get())
            .finish()
    }
}
