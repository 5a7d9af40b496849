pub mod assistant;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod forecast;
pub mod map;
pub mod scoring;
pub mod shell;
pub mod state;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::forecast::TonightScore;
use crate::state::DashboardState;

pub type SharedDashboard = Arc<RwLock<DashboardState>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMetric {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub star_score: u8,
    pub cloud_cover: u8,
    pub light_pollution: u8,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tonight: Vec<TonightScore>,
}

impl LocationMetric {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lng: f64,
        conditions: Conditions,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lng,
            star_score: conditions.star_score,
            cloud_cover: conditions.cloud_cover,
            light_pollution: conditions.light_pollution,
            last_updated,
            district: None,
            description: None,
            tag: None,
            temperature: None,
            tonight: Vec::new(),
        }
    }

    pub fn with_details(mut self, district: &str, description: &str) -> Self {
        self.district = Some(district.to_string());
        self.description = Some(description.to_string());
        self
    }

    pub fn with_outlook(mut self, tag: &str, temperature: &str, tonight: Vec<TonightScore>) -> Self {
        self.tag = Some(tag.to_string());
        self.temperature = Some(temperature.to_string());
        self.tonight = tonight;
        self
    }

    pub fn coordinates(&self) -> String {
        let ns = if self.lat < 0.0 { 'S' } else { 'N' };
        let ew = if self.lng < 0.0 { 'W' } else { 'E' };
        format!("{:.2}° {}, {:.2}° {}", self.lat.abs(), ns, self.lng.abs(), ew)
    }

    pub fn conditions(&self) -> Conditions {
        Conditions {
            star_score: self.star_score,
            cloud_cover: self.cloud_cover,
            light_pollution: self.light_pollution,
        }
    }

    pub fn short_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    pub star_score: u8,
    pub cloud_cover: u8,
    pub light_pollution: u8,
}

impl Conditions {
    pub fn clamped(star_score: i32, cloud_cover: i32, light_pollution: i32) -> Self {
        Self {
            star_score: clamp_percent(star_score as f64),
            cloud_cover: clamp_percent(cloud_cover as f64),
            light_pollution: clamp_percent(light_pollution as f64),
        }
    }
}

pub fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().max(0.0).min(100.0) as u8
}

pub fn format_percent(value: u8) -> String {
    format!("{}%", value)
}

pub fn format_time<Tz: chrono::TimeZone>(value: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    value.format("%H:%M:%S").to_string()
}
