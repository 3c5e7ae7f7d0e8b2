//! Shared domain enumerations and value types decoded from the upstream feed.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::FormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
const PLAIN_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const LOCAL_DATETIME_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
    Scheduled,
    Archived,
    /// Any status string the content source sends that is not recognised.
    #[serde(other)]
    Unknown,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Archived => "archived",
            PostStatus::Unknown => "unknown",
        }
    }
}

/// A timestamp as sent by the content source.
///
/// The raw text is always preserved. `instant` is populated when the text is
/// an RFC 3339 timestamp, a date-time without offset (read as UTC) or a plain
/// `YYYY-MM-DD` date (read as midnight UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    instant: Option<OffsetDateTime>,
}

impl Timestamp {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(raw.trim());
        Self { raw, instant }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> Option<OffsetDateTime> {
        self.instant
    }

    /// `January 2, 2024` style rendering, falling back to the raw text.
    pub fn human(&self) -> String {
        self.instant
            .and_then(|instant| instant.date().format(HUMAN_DATE_FORMAT).ok())
            .unwrap_or_else(|| self.raw.clone())
    }

    /// Newest-first ordering. Unparseable timestamps sort after every parseable one.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        match (self.instant, other.instant) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

fn parse_instant(value: &str) -> Option<OffsetDateTime> {
    if let Ok(instant) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(instant);
    }
    if let Ok(local) = PrimitiveDateTime::parse(value, LOCAL_DATETIME_FORMAT) {
        return Some(local.assume_utc());
    }

    Date::parse(value, PLAIN_DATE_FORMAT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Timestamp::parse)
    }
}
