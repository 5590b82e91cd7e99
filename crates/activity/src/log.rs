use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hamperdesk_core::{ActivityId, Entity};

/// Entries kept after each append; older ones are dropped.
pub const ACTIVITY_LOG_CAP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    HamperCreated,
    HamperUpdated,
    HamperDeleted,
    CustomerCreated,
    CustomerUpdated,
    CustomerDeleted,
    SupplierCreated,
    SupplierUpdated,
    SupplierDeleted,
    OrderCreated,
    OrderUpdated,
    QuoteCreated,
    QuoteUpdated,
    QuoteConverted,
    QuoteExpired,
    InvoiceGenerated,
    InvoiceUpdated,
    InvoiceOverdue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: ActivityId,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Id of the entity the entry is about, if any.
    #[serde(default)]
    pub related_id: Option<String>,
}

impl ActivityLogEntry {
    pub fn new(
        kind: ActivityKind,
        message: impl Into<String>,
        related_id: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            timestamp,
            message: message.into(),
            kind,
            related_id,
        }
    }
}

impl Entity for ActivityLogEntry {
    type Id = ActivityId;
    const COLLECTION: &'static str = "activityLog";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Append `entry` to `log`, keeping it newest-first and capped.
///
/// Entries loaded from older data may be out of order, so the whole log is
/// re-sorted by timestamp rather than just prepending.
pub fn record(log: &mut Vec<ActivityLogEntry>, entry: ActivityLogEntry) {
    log.insert(0, entry);
    // stable: equal timestamps keep insertion order, newest append first
    log.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    log.truncate(ACTIVITY_LOG_CAP);
}
