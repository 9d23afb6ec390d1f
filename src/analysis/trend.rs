//! Chart-ready performance series for one URL.
//!
//! Real recorded analyses are used once there are enough of them. Below that
//! threshold the series is synthesized around a baseline with a bounded random
//! perturbation, one shared delta per point. The series length depends only on
//! the period: 7 daily points for a week, 30 for a month, 12 monthly for a year.

use crate::error::TrendError;
use crate::models::metrics::{PerformanceHistory, PerformanceMetrics};
use chrono::{DateTime, Days, Months, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Real points required before synthesis is skipped.
pub const DEFAULT_MIN_HISTORY: usize = 5;

/// Largest per-point score perturbation, in either direction.
const MAX_DELTA: f64 = 5.0;

const MIN_SYNTHETIC_LOADING_SPEED: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Week,
    Month,
    Year,
}

impl TrendPeriod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "week" => Some(TrendPeriod::Week),
            "month" => Some(TrendPeriod::Month),
            "year" => Some(TrendPeriod::Year),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrendPeriod::Week => "week",
            TrendPeriod::Month => "month",
            TrendPeriod::Year => "year",
        }
    }

    pub fn points(self) -> usize {
        match self {
            TrendPeriod::Week => 7,
            TrendPeriod::Month => 30,
            TrendPeriod::Year => 12,
        }
    }

    fn step_back(self, from: NaiveDate, steps: usize) -> NaiveDate {
        let stepped = match self {
            TrendPeriod::Week | TrendPeriod::Month => from.checked_sub_days(Days::new(steps as u64)),
            TrendPeriod::Year => from.checked_sub_months(Months::new(steps as u32)),
        };
        stepped.unwrap_or(from)
    }

    fn label(self, date: NaiveDate) -> String {
        match self {
            TrendPeriod::Week | TrendPeriod::Month => date.format("%Y-%m-%d").to_string(),
            TrendPeriod::Year => date.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    pub performance: u8,
    pub accessibility: u8,
    pub best_practices: u8,
    pub seo: u8,
    pub loading_speed: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct TrendRequest<'a> {
    pub url: &'a str,
    pub period: TrendPeriod,
    pub history: &'a PerformanceHistory,
    /// Metrics currently on screen; the baseline when `url` has no history.
    pub current: Option<&'a PerformanceMetrics>,
    pub today: NaiveDate,
    pub min_history: usize,
}

pub fn generate_trend<R: Rng + ?Sized>(
    rng: &mut R,
    request: TrendRequest<'_>,
) -> Result<Vec<TrendPoint>, TrendError> {
    let period = request.period;
    let wanted = period.points();

    let mut recorded = request.history.for_url(request.url);
    recorded.sort_by_key(|m| m.timestamp);

    if !recorded.is_empty() && recorded.len() >= request.min_history {
        let recent = &recorded[recorded.len().saturating_sub(wanted)..];
        let baseline = recorded[recorded.len() - 1];

        let earliest = recorded_date(recent[0], request.today);
        let missing = wanted - recent.len();

        // Pad the old end when the real series is shorter than the period.
        let mut points: Vec<TrendPoint> = (1..=missing)
            .rev()
            .map(|step| synthetic_point(rng, baseline, period.label(period.step_back(earliest, step))))
            .collect();
        points.extend(
            recent
                .iter()
                .map(|m| recorded_point(m, period.label(recorded_date(m, request.today)))),
        );
        return Ok(points);
    }

    let baseline = recorded
        .last()
        .copied()
        .or(request.current)
        .ok_or_else(|| TrendError::NoBaseline(request.url.to_string()))?;

    Ok((0..wanted)
        .rev()
        .map(|step| synthetic_point(rng, baseline, period.label(period.step_back(request.today, step))))
        .collect())
}

fn recorded_point(metrics: &PerformanceMetrics, date: String) -> TrendPoint {
    TrendPoint {
        date,
        performance: to_score(metrics.performance),
        accessibility: to_score(metrics.accessibility),
        best_practices: to_score(metrics.best_practices),
        seo: to_score(metrics.seo),
        loading_speed: round2(metrics.loading_speed),
    }
}

fn synthetic_point<R: Rng + ?Sized>(rng: &mut R, baseline: &PerformanceMetrics, date: String) -> TrendPoint {
    let delta = rng.gen_range(-MAX_DELTA..=MAX_DELTA);
    TrendPoint {
        date,
        performance: to_score(baseline.performance + delta),
        accessibility: to_score(baseline.accessibility + delta),
        best_practices: to_score(baseline.best_practices + delta),
        seo: to_score(baseline.seo + delta),
        loading_speed: round2((baseline.loading_speed + delta / 5.0).max(MIN_SYNTHETIC_LOADING_SPEED)),
    }
}

fn recorded_date(metrics: &PerformanceMetrics, fallback: NaiveDate) -> NaiveDate {
    DateTime::from_timestamp_millis(metrics.timestamp)
        .map(|dt| dt.date_naive())
        .unwrap_or(fallback)
}

fn to_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
