// qprofile-core/src/ports/channel.rs

use crate::domain::profile::RuleSetChangedEvent;

/// Outbound broadcast of rule-set changes. Fire-and-forget: delivery is not
/// acknowledged and nothing is retried.
pub trait EventChannel: Send + Sync {
    fn push(&self, event: RuleSetChangedEvent);
}
