use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt::Write;

use crate::forecast::{generate_forecast, peak_visibility, tonight_peak, ForecastPoint, TonightScore};
use crate::scoring::{
    bortle_class, ConditionBand, Rating, Recommendation, RecommendationScorer, Seeing,
    SkyBrightness,
};
use crate::state::DashboardState;
use crate::{format_percent, LocationMetric};

#[derive(Debug, Clone, Serialize)]
pub struct LocationCard {
    pub id: String,
    pub name: String,
    pub star_score: u8,
    pub cloud_cover: u8,
    pub light_pollution: u8,
    pub rating: String,
    pub last_updated: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedDetail {
    pub id: String,
    pub name: String,
    pub district: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub temperature: Option<String>,
    pub coordinates: String,
    pub lat: f64,
    pub lng: f64,
    pub star_score: u8,
    pub cloud_cover: u8,
    pub light_pollution: u8,
    pub rating: String,
    pub band: String,
    pub bortle_class: u8,
    pub sky_brightness: String,
    pub seeing: String,
    pub forecast: Vec<ForecastPoint>,
    pub peak_time: Option<String>,
    pub tonight: Vec<TonightScore>,
    pub tonight_peak: Option<TonightScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonBar {
    pub label: String,
    pub value: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub updated_at: String,
    pub filter: String,
    pub locations: Vec<LocationCard>,
    pub selected: SelectedDetail,
    pub recommendations: Vec<Recommendation>,
    pub comparison: Vec<ComparisonBar>,
}

impl DashboardView {
    pub fn build<Tz: TimeZone>(
        state: &DashboardState,
        scorer: &RecommendationScorer,
        region: &str,
        top_picks: usize,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let selected = state.selected();
        let tz = now.timezone();

        let locations = state
            .visible_locations()
            .into_iter()
            .map(|location| LocationCard {
                id: location.id.clone(),
                name: location.name.clone(),
                star_score: location.star_score,
                cloud_cover: location.cloud_cover,
                light_pollution: location.light_pollution,
                rating: Rating::from_score(location.star_score).label().to_string(),
                last_updated: location
                    .last_updated
                    .with_timezone(&tz)
                    .format("%H:%M:%S")
                    .to_string(),
                selected: location.id == selected.id,
            })
            .collect();

        Self {
            title: format!("Night-Sky Monitoring - {}", region),
            updated_at: now.format("%H:%M:%S").to_string(),
            filter: state.filter().to_string(),
            locations,
            selected: selected_detail(selected, now),
            recommendations: scorer.top_picks(state.locations(), top_picks),
            comparison: comparison(state.locations()),
        }
    }
}

pub fn selected_detail<Tz: TimeZone>(location: &LocationMetric, now: &DateTime<Tz>) -> SelectedDetail {
    let bortle = bortle_class(location.light_pollution);
    let forecast = generate_forecast(&location.conditions(), now);
    let peak_time = peak_visibility(&forecast).map(|point| point.time.clone());

    SelectedDetail {
        id: location.id.clone(),
        name: location.name.clone(),
        district: location.district.clone(),
        description: location.description.clone(),
        tag: location.tag.clone(),
        temperature: location.temperature.clone(),
        coordinates: location.coordinates(),
        lat: location.lat,
        lng: location.lng,
        star_score: location.star_score,
        cloud_cover: location.cloud_cover,
        light_pollution: location.light_pollution,
        rating: Rating::from_score(location.star_score).label().to_string(),
        band: ConditionBand::from_score(location.star_score).label().to_string(),
        bortle_class: bortle,
        sky_brightness: SkyBrightness::from_bortle(bortle).label().to_string(),
        seeing: Seeing::from_score(location.star_score).label().to_string(),
        forecast,
        peak_time,
        tonight: location.tonight.clone(),
        tonight_peak: tonight_peak(&location.tonight).cloned(),
    }
}

pub fn comparison(locations: &[LocationMetric]) -> Vec<ComparisonBar> {
    locations
        .iter()
        .map(|location| ComparisonBar {
            label: location.short_name().to_string(),
            value: location.star_score,
        })
        .collect()
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "Updated: {}", view.updated_at);

    let _ = writeln!(out);
    if view.filter.is_empty() {
        let _ = writeln!(out, "Locations:");
    } else {
        let _ = writeln!(out, "Locations matching \"{}\":", view.filter);
    }
    if view.locations.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for card in &view.locations {
        let marker = if card.selected { "*" } else { " " };
        let _ = writeln!(
            out,
            " {} {:<20} {:<9} stars {:>3} | cloud {:>4} | light {:>4} | updated {}",
            marker,
            card.name,
            card.rating,
            card.star_score,
            format_percent(card.cloud_cover),
            format_percent(card.light_pollution),
            card.last_updated
        );
    }

    let _ = writeln!(out);
    out.push_str(&render_selected(&view.selected));

    let _ = writeln!(out);
    let _ = writeln!(out, "Daily recommendations:");
    for (rank, pick) in view.recommendations.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<20} score {:>3} | {} (stars {})",
            rank + 1,
            pick.name,
            pick.score,
            pick.rating.label(),
            pick.star_score
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Compare locations:");
    for bar in &view.comparison {
        let _ = writeln!(
            out,
            "  {:<10} {:>3} {}",
            bar.label,
            bar.value,
            "#".repeat(usize::from(bar.value) / 5)
        );
    }

    out
}

pub fn render_selected(detail: &SelectedDetail) -> String {
    let mut out = String::new();
    match detail.tag.as_ref() {
        Some(tag) => {
            let _ = writeln!(out, "Selected location - {} [{}]", detail.name, tag);
        }
        None => {
            let _ = writeln!(out, "Selected location - {}", detail.name);
        }
    }
    if let Some(district) = detail.district.as_ref() {
        let _ = writeln!(out, "  District: {}", district);
    }
    let _ = writeln!(out, "  Coordinates: {}", detail.coordinates);
    if let Some(temperature) = detail.temperature.as_ref() {
        let _ = writeln!(out, "  Temperature: {}", temperature);
    }
    if let Some(description) = detail.description.as_ref() {
        let _ = writeln!(out, "  {}", description);
    }
    let _ = writeln!(out, "  Star visibility: {}", detail.star_score);
    let _ = writeln!(out, "  Cloud cover: {}", format_percent(detail.cloud_cover));
    let _ = writeln!(out, "  Light pollution: {}", format_percent(detail.light_pollution));
    let _ = writeln!(out, "  Rating: {} ({})", detail.rating, detail.band);
    let _ = writeln!(
        out,
        "  Bortle class {} ({}) | Seeing: {}",
        detail.bortle_class, detail.sky_brightness, detail.seeing
    );
    out.push_str(&render_forecast(&detail.forecast));
    if let Some(peak) = detail.peak_time.as_ref() {
        let _ = writeln!(out, "  Peak visibility around {}", peak);
    }
    if !detail.tonight.is_empty() {
        let _ = writeln!(out, "  Tonight:");
        for entry in &detail.tonight {
            let _ = writeln!(
                out,
                "  {:>6} {:>3} {}",
                entry.time,
                entry.score,
                "#".repeat(usize::from(entry.score) / 5)
            );
        }
        if let Some(peak) = detail.tonight_peak.as_ref() {
            let _ = writeln!(out, "  Best tonight: {} at {}", peak.score, peak.time);
        }
    }
    out
}

pub fn render_forecast(points: &[ForecastPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:>6} {:>6} {:>6} {:>6}", "time", "stars", "cloud", "light");
    for point in points {
        let _ = writeln!(
            out,
            "  {:>6} {:>6} {:>6} {:>6}",
            point.time, point.star_score, point.cloud_cover, point.light_pollution
        );
    }
    out
}
