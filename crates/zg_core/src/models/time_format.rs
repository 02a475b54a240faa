//! `HH:MM` serde helpers for time-of-day fields.
//!
//! Store rows and caller configs carry times as `"10:00"`; seconds are accepted on input
//! and dropped on output.

use crate::error::{EngineError, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| EngineError::InvalidTime(raw.to_string()))
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_time(time))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_time(&raw).map_err(serde::de::Error::custom)
}

pub mod list {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(
        times: &[NaiveTime],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(times.len()))?;
        for time in times {
            seq.serialize_element(&format_time(time))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<NaiveTime>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter().map(|s| parse_time(s).map_err(serde::de::Error::custom)).collect()
    }
}
