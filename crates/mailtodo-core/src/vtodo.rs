//! iCalendar VTODO serialization.

use chrono::{DateTime, Utc};

use crate::uid::Uid;

/// Version written into `PRODID`.
pub const PRODUCT_VERSION: &str = "undefined";

/// Timestamp layout for `DATE-TIME` values.
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Rendering of a missing or unparseable timestamp.
pub const ZERO_TIMESTAMP: &str = "00010101T000000Z";

/// A task derived from one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRecord {
    /// Task identifier, also the file name stem.
    pub uid: Uid,
    /// Decoded, HTML-escaped subject.
    pub summary: String,
    /// Selected body with newlines escaped.
    pub description: String,
    /// When the email was sent, if known.
    pub dtstamp: Option<DateTime<Utc>>,
    /// When the conversion ran.
    pub created: DateTime<Utc>,
}

impl TodoRecord {
    /// Serializes the task as a single-VTODO calendar.
    ///
    /// Values are inserted verbatim; escaping is the caller's job.
    #[must_use]
    pub fn to_ics(&self) -> String {
        let created = format_timestamp(Some(self.created));
        let dtstamp = format_timestamp(self.dtstamp);

        [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:-//Nextcloud Tasks v{PRODUCT_VERSION}"),
            "BEGIN:VTODO".to_string(),
            format!("CREATED;VALUE=DATE-TIME:{created}"),
            format!("DESCRIPTION:{}", self.description),
            format!("DTSTAMP;VALUE=DATE-TIME:{dtstamp}"),
            format!("LAST-MODIFIED;VALUE=DATE-TIME:{created}"),
            "PERCENT-COMPLETE:0".to_string(),
            "PRIORITY:0".to_string(),
            "SEQUENCE:6".to_string(),
            "STATUS:NEEDS-ACTION".to_string(),
            format!("SUMMARY:{}", self.summary),
            format!("UID:{}", self.uid),
            "X-OC-HIDESUBTASKS:0".to_string(),
            "END:VTODO".to_string(),
            "END:VCALENDAR".to_string(),
        ]
        .join("\n")
    }
}

/// Formats a timestamp as `YYYYMMDDTHHMMSSZ` in UTC.
#[must_use]
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || ZERO_TIMESTAMP.to_string(),
        |ts| ts.format(TIMESTAMP_FORMAT).to_string(),
    )
}
