use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{clamp_percent, Conditions};

pub const FORECAST_POINTS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub time: String,
    pub at: DateTime<Utc>,
    pub star_score: u8,
    pub cloud_cover: u8,
    pub light_pollution: u8,
}

// Values depend only on the point index and `base`; `now` drives the labels.
pub fn generate_forecast<Tz: TimeZone>(base: &Conditions, now: &DateTime<Tz>) -> Vec<ForecastPoint> {
    let last = (FORECAST_POINTS - 1) as i64;

    (0..FORECAST_POINTS)
        .map(|index| {
            let i = index as f64;
            let at = now.clone() - Duration::hours(last - index as i64);
            ForecastPoint {
                time: format!("{}:00", at.hour()),
                at: at.with_timezone(&Utc),
                star_score: clamp_percent(base.star_score as f64 + 8.0 * (i / 3.0).sin()),
                cloud_cover: clamp_percent(base.cloud_cover as f64 + 7.0 * (i / 4.0).cos()),
                light_pollution: clamp_percent(base.light_pollution as f64 + 5.0 * (i / 2.0).sin()),
            }
        })
        .collect()
}

pub fn peak_visibility(points: &[ForecastPoint]) -> Option<&ForecastPoint> {
    points.iter().fold(None, |best: Option<&ForecastPoint>, point| match best {
        Some(current) if current.star_score >= point.star_score => Some(current),
        _ => Some(point),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TonightScore {
    pub time: String,
    pub score: u8,
}

pub fn tonight_peak(scores: &[TonightScore]) -> Option<&TonightScore> {
    scores.iter().fold(None, |best: Option<&TonightScore>, entry| match best {
        Some(current) if current.score >= entry.score => Some(current),
        _ => Some(entry),
    })
}
