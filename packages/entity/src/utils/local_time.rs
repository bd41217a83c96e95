//! Serde adapter for event times.
//!
//! Events are written as local wall-clock times without an offset, minute
//! precision (`2025-03-01T18:30`). Reads also accept a seconds component so
//! documents written by other clients still decode.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%dT%H:%M";
const FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a `date`/`time` pair as entered in a form (`2025-03-01`, `18:30`).
pub fn parse(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() || time.is_empty() {
        return None;
    }
    parse_combined(&format!("{}T{}", date, time))
}

pub fn parse_combined(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, FORMAT_WITH_SECONDS))
        .ok()
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.format(FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_combined(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid local time: {}", text)))
}
