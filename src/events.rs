use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{channel, Receiver, Sender};

use crate::models::session::SessionStatus;

/// Lifecycle changes pushed to SSE subscribers. Mobile numbers are masked.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    SessionStarted {
        mobile_number: String,
        trial_start_date: DateTime<Utc>,
    },
    TrialExpired {
        mobile_number: String,
        expired_at: DateTime<Utc>,
    },
    PremiumActivated {
        mobile_number: String,
        previous_status: SessionStatus,
        premium_expiry_date: DateTime<Utc>,
    },
}

#[derive(Clone)]
pub struct EventBroadcaster {
    sender: Sender<SessionEvent>,
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = channel(256);
        Self { sender }
    }

    pub fn broadcast(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}
