//! Wire-facing request and response types.

pub mod broadcast;
pub mod game;
pub mod stats;
pub mod ws;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Render an instant as an RFC 3339 string for wire payloads.
pub(crate) fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339)
        .unwrap_or_else(|_| String::from("invalid-timestamp"))
}

/// Render the current instant as an RFC 3339 string.
pub(crate) fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}
