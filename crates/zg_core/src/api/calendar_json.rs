// JSON entry points for mid-season calendar adjustment.

use super::response::{parse_request, respond};
use crate::error::Result;
use crate::models::{Match, Team};
use crate::schedule::{AdjustOptions, AdjustmentAnalysis, AdjustmentPlan, CalendarAdjuster, InferredSchedule};
use crate::settings::EngineSettings;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AnalyzeCalendarRequest {
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
pub struct PlanAdjustmentRequest {
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<Match>,
    /// Start point when no round is finished yet.
    pub today: NaiveDate,
    #[serde(flatten)]
    pub options: AdjustOptions,
}

#[derive(Debug, Serialize)]
pub struct CalendarAnalysisData {
    pub analysis: AdjustmentAnalysis,
    pub inferred: InferredSchedule,
}

fn adjuster() -> Result<CalendarAdjuster> {
    Ok(CalendarAdjuster::new(&EngineSettings::from_env()?))
}

pub fn analyze_calendar_json(request_json: &str) -> String {
    respond(parse_request::<AnalyzeCalendarRequest>(request_json).and_then(|req| {
        let adjuster = adjuster()?;
        Ok(CalendarAnalysisData {
            analysis: adjuster.analyze(&req.teams, &req.matches),
            inferred: adjuster.infer_schedule(&req.matches),
        })
    }))
}

/// Analysis plus, when called for, the replacement calendar. Nothing is persisted.
pub fn plan_adjustment_json(request_json: &str) -> String {
    respond(parse_request::<PlanAdjustmentRequest>(request_json).and_then(|req| -> Result<AdjustmentPlan> {
        adjuster()?.plan(&req.teams, &req.matches, req.today, req.options)
    }))
}
