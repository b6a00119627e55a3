use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events emitted by the core. A downstream notification subsystem may
/// subscribe; nothing in this crate depends on anyone listening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    CorrectionApproved {
        entry_id: i64,
        decided_by: Option<i64>,
        decided_at: DateTime<Utc>,
    },
    CorrectionRejected {
        entry_id: i64,
        decided_by: Option<i64>,
        decided_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::CorrectionApproved {
                entry_id,
                decided_by,
                ..
            } => {
                info!(
                    entry_id = entry_id,
                    decided_by = ?decided_by,
                    "Correction approved"
                );
            }
            Event::CorrectionRejected {
                entry_id,
                decided_by,
                ..
            } => {
                info!(
                    entry_id = entry_id,
                    decided_by = ?decided_by,
                    "Correction rejected"
                );
            }
        }
    }
    warn!("Event channel closed; event processor exiting");
}
