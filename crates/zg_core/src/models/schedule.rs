use super::team::TeamId;
use super::time_format;
use crate::error::{EngineError, Result};
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Weekday a league plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl MatchDay {
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => MatchDay::Monday,
            Weekday::Tue => MatchDay::Tuesday,
            Weekday::Wed => MatchDay::Wednesday,
            Weekday::Thu => MatchDay::Thursday,
            Weekday::Fri => MatchDay::Friday,
            Weekday::Sat => MatchDay::Saturday,
            Weekday::Sun => MatchDay::Sunday,
        }
    }

    pub fn to_weekday(self) -> Weekday {
        match self {
            MatchDay::Monday => Weekday::Mon,
            MatchDay::Tuesday => Weekday::Tue,
            MatchDay::Wednesday => Weekday::Wed,
            MatchDay::Thursday => Weekday::Thu,
            MatchDay::Friday => Weekday::Fri,
            MatchDay::Saturday => Weekday::Sat,
            MatchDay::Sunday => Weekday::Sun,
        }
    }
}

/// League time band with a preset list of kick-off times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBand {
    Morning,
    Afternoon,
    Evening,
}

impl TimeBand {
    pub fn slots(&self) -> Vec<NaiveTime> {
        let hm: &[(u32, u32)] = match self {
            TimeBand::Morning => &[(8, 0), (9, 30), (11, 0), (12, 30)],
            TimeBand::Afternoon => &[(14, 0), (15, 30), (17, 0), (18, 30)],
            TimeBand::Evening => &[(19, 0), (20, 30), (22, 0)],
        };
        hm.iter().filter_map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScheduleMode {
    Preset { band: TimeBand },
    Custom {
        #[serde(with = "time_format::list")]
        times: Vec<NaiveTime>,
    },
}

impl ScheduleMode {
    pub fn time_slots(&self) -> Vec<NaiveTime> {
        match self {
            ScheduleMode::Preset { band } => band.slots(),
            ScheduleMode::Custom { times } => times.clone(),
        }
    }
}

/// Designated team that always kicks off at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSlot {
    pub team_id: TeamId,
    #[serde(with = "time_format")]
    pub preferred_time: NaiveTime,
}

/// Caller-facing fixture request, as filled in by an administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRequest {
    #[serde(default)]
    pub tournament_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub match_days: Vec<MatchDay>,
    pub mode: ScheduleMode,
    pub field_count: u32,
    #[serde(default)]
    pub double_round: bool,
    #[serde(default)]
    pub fixed_slot: Option<FixedSlot>,
}

impl FixtureRequest {
    /// Normalize into the config the engine runs on. Fails fast on anything incomplete.
    pub fn resolve(&self) -> Result<(String, ScheduleConfig)> {
        let tournament_id = self
            .tournament_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(EngineError::MissingTournament)?
            .to_string();
        let start_date = self.start_date.ok_or(EngineError::MissingStartDate)?;

        let config = ScheduleConfig {
            start_date,
            match_days: self.match_days.clone(),
            time_slots: self.mode.time_slots(),
            field_count: self.field_count,
            double_round: self.double_round,
            fixed_slot: self.fixed_slot.clone(),
        };
        config.validate()?;
        Ok((tournament_id, config))
    }
}

/// Normalized recurring weekly pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub start_date: NaiveDate,
    pub match_days: Vec<MatchDay>,
    #[serde(with = "time_format::list")]
    pub time_slots: Vec<NaiveTime>,
    pub field_count: u32,
    #[serde(default)]
    pub double_round: bool,
    #[serde(default)]
    pub fixed_slot: Option<FixedSlot>,
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.match_days.is_empty() {
            return Err(EngineError::EmptyMatchDays);
        }
        if self.time_slots.is_empty() {
            return Err(EngineError::EmptyTimeSlots);
        }
        if self.field_count == 0 {
            return Err(EngineError::InvalidFieldCount(self.field_count));
        }
        Ok(())
    }

    pub fn plays_on(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        self.match_days.contains(&MatchDay::from_weekday(date.weekday()))
    }

    /// Matches a single matchday can hold.
    pub fn slots_per_day(&self) -> usize {
        self.time_slots.len() * self.field_count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> FixtureRequest {
        FixtureRequest {
            tournament_id: Some("apertura".into()),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            match_days: vec![MatchDay::Saturday],
            mode: ScheduleMode::Preset { band: TimeBand::Morning },
            field_count: 2,
            double_round: false,
            fixed_slot: None,
        }
    }

    #[test]
    fn test_preset_resolves_to_band_times() {
        let (id, config) = request().resolve().unwrap();
        assert_eq!(id, "apertura");
        assert_eq!(config.time_slots.len(), 4);
        assert_eq!(config.time_slots[1], NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(config.slots_per_day(), 8);
    }

    #[test]
    fn test_resolve_rejects_missing_fields() {
        let mut req = request();
        req.tournament_id = Some("  ".into());
        assert!(matches!(req.resolve(), Err(EngineError::MissingTournament)));

        let mut req = request();
        req.start_date = None;
        assert!(matches!(req.resolve(), Err(EngineError::MissingStartDate)));

        let mut req = request();
        req.match_days.clear();
        assert!(matches!(req.resolve(), Err(EngineError::EmptyMatchDays)));

        let mut req = request();
        req.mode = ScheduleMode::Custom { times: vec![] };
        assert!(matches!(req.resolve(), Err(EngineError::EmptyTimeSlots)));

        let mut req = request();
        req.field_count = 0;
        assert!(matches!(req.resolve(), Err(EngineError::InvalidFieldCount(0))));
    }

    #[test]
    fn test_custom_mode_from_json() {
        let raw = r#"{
            "tournament_id": "clausura",
            "start_date": "2025-08-03",
            "match_days": ["sunday"],
            "mode": { "type": "custom", "times": ["10:00", "12:00"] },
            "field_count": 1
        }"#;
        let req: FixtureRequest = serde_json::from_str(raw).unwrap();
        let (_, config) = req.resolve().unwrap();
        assert_eq!(config.time_slots.len(), 2);
        assert!(!config.double_round);
        assert!(config.plays_on(NaiveDate::from_ymd_opt(2025, 8, 3).unwrap()));
        assert!(!config.plays_on(NaiveDate::from_ymd_opt(2025, 8, 4).unwrap()));
    }

    #[test]
    fn test_match_day_weekday_round_trip() {
        for day in [MatchDay::Monday, MatchDay::Thursday, MatchDay::Sunday] {
            assert_eq!(MatchDay::from_weekday(day.to_weekday()), day);
        }
    }
}
