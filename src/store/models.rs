use chrono::NaiveDateTime;
use sqlx::FromRow;

/// A user account as stored by the user-management system.
///
/// Read-only for this crate; only the columns the warning job needs are
/// selected.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    /// Login identifier, expected to be an e-mail address
    pub username: String,
    pub enable: bool,
    pub expire_time: NaiveDateTime,
}

/// Outcome of a single delivery attempt as persisted in `email_log.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Failed,
    Delivered,
}

impl DeliveryStatus {
    /// Column value for this status.
    pub fn code(self) -> i32 {
        match self {
            DeliveryStatus::Failed => 0,
            DeliveryStatus::Delivered => 1,
        }
    }

    /// Parse a column value. Anything other than `1` counts as a failure.
    pub fn from_code(code: i32) -> Self {
        if code == 1 {
            DeliveryStatus::Delivered
        } else {
            DeliveryStatus::Failed
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeliveryStatus::Failed => "failed",
            DeliveryStatus::Delivered => "delivered",
        };
        write!(f, "{}", s)
    }
}

/// A persisted notification log row.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationLog {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub status: i32,
    /// Transport error message; empty when delivered
    pub error: String,
    pub created_at: NaiveDateTime,
}

impl NotificationLog {
    pub fn delivery_status(&self) -> DeliveryStatus {
        DeliveryStatus::from_code(self.status)
    }
}

/// A notification log row to be inserted.
#[derive(Debug, Clone)]
pub struct NewNotificationLog {
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub status: DeliveryStatus,
    pub error: String,
    pub created_at: NaiveDateTime,
}

impl NewNotificationLog {
    /// Row for a delivered notification.
    pub fn delivered(user_id: i64, title: &str, content: &str, created_at: NaiveDateTime) -> Self {
        Self {
            user_id,
            title: title.to_string(),
            content: content.to_string(),
            status: DeliveryStatus::Delivered,
            error: String::new(),
            created_at,
        }
    }

    /// Row for a failed delivery carrying the transport error.
    pub fn failed(
        user_id: i64,
        title: &str,
        content: &str,
        error: &str,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            user_id,
            title: title.to_string(),
            content: content.to_string(),
            status: DeliveryStatus::Failed,
            error: error.to_string(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_column_values() {
        assert_eq!(DeliveryStatus::Delivered.code(), 1);
        assert_eq!(DeliveryStatus::Failed.code(), 0);
        assert_eq!(DeliveryStatus::from_code(1), DeliveryStatus::Delivered);
        assert_eq!(DeliveryStatus::from_code(0), DeliveryStatus::Failed);
        assert_eq!(DeliveryStatus::from_code(7), DeliveryStatus::Failed);
    }

    #[test]
    fn delivered_row_has_empty_error() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let row = NewNotificationLog::delivered(7, "title", "body", now);
        assert_eq!(row.status, DeliveryStatus::Delivered);
        assert!(row.error.is_empty());
    }
}
