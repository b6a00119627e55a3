use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{approval::ApprovalService, corrections::CorrectionsService};

pub mod corrections;

/// Services shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub corrections: CorrectionsService,
    pub approval: ApprovalService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            corrections: CorrectionsService::new(db.clone()),
            approval: ApprovalService::new(db, Some(event_sender)),
        }
    }
}
