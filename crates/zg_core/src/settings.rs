//! Engine tunables.
//!
//! Every field has a default so an empty `{}` is a valid settings file. Callers that want
//! to override defaults point `ZG_ENGINE_SETTINGS_PATH` at a JSON file.

use crate::error::{EngineError, Result};
use crate::models::time_format;
use crate::models::MatchDay;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::{env, fs};

pub const SETTINGS_PATH_ENV: &str = "ZG_ENGINE_SETTINGS_PATH";

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Substitutes used when a tournament has no scheduled matches to infer a pattern from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceDefaults {
    pub match_day: MatchDay,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    pub slot_minutes: u32,
    pub field_count: u32,
    pub slots_per_day: u32,
    /// Gaps above this are day boundaries, not slot spacing.
    pub max_slot_gap_minutes: u32,
}

impl Default for InferenceDefaults {
    fn default() -> Self {
        Self {
            match_day: MatchDay::Sunday,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            slot_minutes: 75,
            field_count: 2,
            slots_per_day: 4,
            max_slot_gap_minutes: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayoffTiming {
    /// Gap between kick-offs on one playoff day. Spacing past midnight moves the match to the next date.
    pub match_spacing_minutes: u32,
    pub second_leg_offset_days: u32,
    pub round_spacing_days: u32,
}

impl Default for PlayoffTiming {
    fn default() -> Self {
        Self { match_spacing_minutes: 90, second_leg_offset_days: 3, round_spacing_days: 7 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub inference: InferenceDefaults,
    pub playoffs: PlayoffTiming,
    pub weekday_probe_limit: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            inference: InferenceDefaults::default(),
            playoffs: PlayoffTiming::default(),
            weekday_probe_limit: 7,
        }
    }
}

impl EngineSettings {
    pub fn from_json(raw: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.inference.slot_minutes, "inference.slot_minutes"),
            (self.inference.field_count, "inference.field_count"),
            (self.inference.slots_per_day, "inference.slots_per_day"),
            (self.inference.max_slot_gap_minutes, "inference.max_slot_gap_minutes"),
            (self.playoffs.match_spacing_minutes, "playoffs.match_spacing_minutes"),
            (self.playoffs.round_spacing_days, "playoffs.round_spacing_days"),
            (self.weekday_probe_limit, "weekday_probe_limit"),
        ];
        for (value, name) in checks {
            if value == 0 {
                return Err(EngineError::InvalidSettings(format!("{name} must be positive")));
            }
        }
        if self.inference.slot_minutes >= MINUTES_PER_DAY {
            return Err(EngineError::InvalidSettings(
                "inference.slot_minutes must be shorter than a day".into(),
            ));
        }
        if self.playoffs.second_leg_offset_days >= self.playoffs.round_spacing_days {
            return Err(EngineError::InvalidSettings(
                "playoffs.second_leg_offset_days must be shorter than round_spacing_days".into(),
            ));
        }
        Ok(())
    }

    /// Settings from the file named by `ZG_ENGINE_SETTINGS_PATH`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(SETTINGS_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidSettings(format!(
                "failed to read {SETTINGS_PATH_ENV}='{path}': {e}"
            ))
        })?;
        let settings = Self::from_json(&content)?;
        tracing::info!(path, "engine settings loaded");
        Ok(settings)
    }
}
