// qprofile-core/src/infrastructure/adapters/broadcast.rs

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::profile::RuleSetChangedEvent;
use crate::ports::EventChannel;

/// Fans rule-set change events out to every live subscriber.
///
/// Slow subscribers lag and lose the oldest events once `capacity` is
/// exceeded; the publisher is never blocked.
#[derive(Debug, Clone)]
pub struct BroadcastChannel {
    sender: broadcast::Sender<RuleSetChangedEvent>,
}

impl BroadcastChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RuleSetChangedEvent> {
        self.sender.subscribe()
    }
}

impl EventChannel for BroadcastChannel {
    fn push(&self, event: RuleSetChangedEvent) {
        let projects = event.project_keys.len();
        match self.sender.send(event) {
            Ok(receivers) => debug!(receivers, projects, "Rule set change broadcast"),
            Err(_) => warn!(projects, "Rule set change dropped: no subscriber"),
        }
    }
}
