/// The in-memory alert feed.
///
/// Alerts are kept newest-first and capped at [`ALERT_CAP`]; entries past
/// the cap are dropped from the tail. Alerts are never deleted
/// individually — acknowledgment flips a flag and leaves the record in
/// place so the dashboard history stays intact.
///
/// # Clock injection
/// `push` takes a `now: DateTime<Utc>` parameter rather than calling
/// `Utc::now()` internally, so tests control both timestamps and ids.

use chrono::{DateTime, Utc};

use crate::model::{Alert, EngineError, Severity};

/// Maximum number of alerts retained; the oldest past this are dropped.
pub const ALERT_CAP: usize = 50;

/// Newest-first alert list with monotonic id assignment.
#[derive(Debug, Default)]
pub struct AlertFeed {
    alerts: Vec<Alert>,
    last_id: i64,
}

impl AlertFeed {
    pub fn new() -> Self {
        AlertFeed::default()
    }

    /// Prepends a new unacknowledged alert and truncates to the cap.
    ///
    /// The id is the creation time in milliseconds, bumped past the
    /// previous id when several alerts land in the same millisecond so
    /// ids stay strictly increasing.
    pub fn push(
        &mut self,
        zone: &str,
        msg: String,
        severity: Severity,
        now: DateTime<Utc>,
    ) -> &Alert {
        let id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        self.alerts.insert(
            0,
            Alert {
                id,
                zone: zone.to_string(),
                msg,
                severity,
                time: now.to_rfc3339(),
                acknowledged: false,
            },
        );
        self.alerts.truncate(ALERT_CAP);
        &self.alerts[0]
    }

    /// Marks an alert acknowledged. Re-acknowledging is a no-op success;
    /// an unknown id is `AlertNotFound`.
    pub fn acknowledge(&mut self, id: i64) -> Result<&Alert, EngineError> {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.acknowledged = true;
                Ok(alert)
            }
            None => Err(EngineError::AlertNotFound(id)),
        }
    }

    /// The `count` most recent alerts, newest first.
    pub fn recent(&self, count: usize) -> &[Alert] {
        &self.alerts[..count.min(self.alerts.len())]
    }

    /// All retained alerts, newest first.
    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Number of alerts not yet acknowledged — the dashboard's "active"
    /// count.
    pub fn unacknowledged_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.acknowledged).count()
    }

    /// True if any unacknowledged alert message contains `needle`.
    /// Used by the threshold rule to avoid stacking duplicate warnings
    /// while one is still outstanding.
    pub fn has_unacknowledged_containing(&self, needle: &str) -> bool {
        self.alerts
            .iter()
            .any(|a| !a.acknowledged && a.msg.contains(needle))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
