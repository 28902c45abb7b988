//! Zaptec API record types.
//!
//! Field names follow the API's PascalCase wire naming. Each record
//! declares its schema for [`crate::schema::validate`].

mod charger;
mod installation;
mod report;
mod session;

pub use charger::*;
pub use installation::*;
pub use report::*;
pub use session::*;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse an API timestamp.
///
/// The API mixes RFC 3339 timestamps and offset-less ones; the latter are
/// UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde adapter for [`parse_timestamp`].
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_timestamp(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{s}'")))
    }
}
