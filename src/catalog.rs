use chrono::{DateTime, Utc};

use crate::forecast::TonightScore;
use crate::scoring::light_pollution_from_bortle;
use crate::{Conditions, LocationMetric};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Observatories,
    Sites,
}

impl Dataset {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "observatories" | "observatory" | "default" => Some(Dataset::Observatories),
            "sites" | "site" | "skywatch" => Some(Dataset::Sites),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dataset::Observatories => "observatories",
            Dataset::Sites => "sites",
        }
    }
}

pub fn seed(dataset: Dataset, now: DateTime<Utc>) -> Vec<LocationMetric> {
    match dataset {
        Dataset::Observatories => observatories(now),
        Dataset::Sites => sites(now),
    }
}

const TONIGHT_HOURS: [&str; 9] = [
    "8 PM", "9 PM", "10 PM", "11 PM", "12 AM", "1 AM", "2 AM", "3 AM", "4 AM",
];

fn observatories(now: DateTime<Utc>) -> Vec<LocationMetric> {
    let observatory = |id: &str, name: &str, lat: f64, lng: f64, metrics: (i32, i32, i32)| {
        let (star, cloud, light) = metrics;
        LocationMetric::new(id, name, lat, lng, Conditions::clamped(star, cloud, light), now)
    };

    vec![
        observatory("raipur", "Raipur Observatory", 21.2514, 81.6296, (62, 20, 70)),
        observatory("bilaspur", "Bilaspur Field", 22.0793, 82.1391, (75, 10, 45)),
        observatory("jashpur", "Jashpur Hills", 22.6579, 84.0289, (88, 5, 12)),
        observatory("bastar", "Bastar Clearing", 19.079, 82.1391, (80, 12, 20)),
    ]
}

fn sites(now: DateTime<Utc>) -> Vec<LocationMetric> {
    let site = |id: &str, name: &str, lat: f64, lng: f64, visibility: i32, cloud: i32, bortle: u8| {
        let light = light_pollution_from_bortle(bortle) as i32;
        LocationMetric::new(id, name, lat, lng, Conditions::clamped(visibility, cloud, light), now)
    };

    vec![
        site("mainpat", "Mainpat", 22.82, 83.29, 92, 12, 3)
            .with_details(
                "Surguja",
                "Hill plateau at altitude with very little artificial light around it.",
            )
            .with_outlook("Top Pick", "14°C", tonight(&[85, 88, 92, 94, 95, 92, 88, 75, 70])),
        site("barnawapara", "Barnawapara", 21.40, 82.40, 78, 25, 4)
            .with_details(
                "Mahasamund",
                "Wildlife sanctuary with fairly dark skies and some glow from nearby towns.",
            )
            .with_outlook("Good", "21°C", tonight(&[70, 75, 78, 80, 82, 78, 75, 70, 60])),
        site("raipur-city", "Raipur City", 21.25, 81.62, 35, 40, 8)
            .with_details(
                "Raipur",
                "Urban centre with heavy light pollution; mostly the moon and bright planets.",
            )
            .with_outlook("Poor", "26°C", tonight(&[20, 25, 30, 32, 35, 34, 32, 28, 25])),
        site("chitrakote", "Chitrakote", 19.12, 81.70, 95, 5, 2)
            .with_details(
                "Bastar",
                "Beside the Chitrakote falls, with pristine skies suited to astrophotography.",
            )
            .with_outlook("Excellent", "19°C", tonight(&[90, 93, 95, 97, 98, 98, 96, 90, 85])),
    ]
}

fn tonight(scores: &[u8]) -> Vec<TonightScore> {
    TONIGHT_HOURS
        .iter()
        .zip(scores)
        .map(|(time, score)| TonightScore {
            time: time.to_string(),
            score: *score,
        })
        .collect()
}
