//! # Status Notifications
//!
//! Short-lived messages for the status bar. Each carries its expiry; readers
//! filter on it, so nothing needs a timer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DRAFT_RESTORED: &str = "Retrieved previous draft details.";
pub const DRAFT_SAVED: &str = "Draft saved successfully.";
pub const DRAFT_DELETED: &str = "Draft deleted successfully.";
pub const ROLLS_SAVED: &str = "Coin rolls saved successfully.";
pub const DROP_SUBMITTED: &str = "Cash drop submitted successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNotification {
    pub text: String,
    pub kind: NotificationKind,
    pub expires_at: DateTime<Utc>,
}

impl StatusNotification {
    pub fn new(
        text: impl Into<String>,
        kind: NotificationKind,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        StatusNotification {
            text: text.into(),
            kind,
            expires_at: now + ttl,
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_expires_after_ttl() {
        let now = Utc.with_ymd_and_hms(2026, 2, 3, 18, 0, 0).unwrap();
        let n = StatusNotification::new(DRAFT_SAVED, NotificationKind::Success, now, Duration::seconds(5));

        assert!(n.is_active(now));
        assert!(n.is_active(now + Duration::milliseconds(4_999)));
        assert!(!n.is_active(now + Duration::seconds(5)));
        assert!(!n.is_error());
    }
}
