use serde::{Deserialize, Serialize};

use crate::config::MapConfig;
use crate::LocationMetric;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn parse(value: &str) -> Result<Self, String> {
        let (lat, lng) = value
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LNG, got {:?}", value))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|err| format!("invalid latitude {:?}: {}", lat.trim(), err))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|err| format!("invalid longitude {:?}: {}", lng.trim(), err))?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("position out of range: {}, {}", lat, lng));
        }
        Ok(Self { lat, lng })
    }

    // Great-circle distance.
    pub fn distance_km(&self, other: GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlng = (other.lng - self.lng).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nearby {
    pub position: GeoPoint,
    pub id: String,
    pub name: String,
    pub distance_km: f64,
}

/// Resolves a user-supplied `LAT,LNG` to the closest location. An empty value
/// means no position source was available.
pub fn locate(locations: &[LocationMetric], near: &str) -> Result<Nearby, String> {
    if near.trim().is_empty() {
        return Err("Location unavailable: no position source; pass --near LAT,LNG".to_string());
    }
    let position =
        GeoPoint::parse(near).map_err(|err| format!("Location unavailable: {}", err))?;

    locations
        .iter()
        .map(|location| {
            let distance = position.distance_km(GeoPoint {
                lat: location.lat,
                lng: location.lng,
            });
            (location, distance)
        })
        .fold(None, |best: Option<(&LocationMetric, f64)>, (location, distance)| match best {
            Some((_, current)) if current <= distance => best,
            _ => Some((location, distance)),
        })
        .map(|(location, distance)| Nearby {
            position,
            id: location.id.clone(),
            name: location.name.clone(),
            distance_km: distance,
        })
        .ok_or_else(|| "Location unavailable: no locations to compare".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub position: GeoPoint,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
    pub map_id: String,
    pub marker: Option<MapMarker>,
    pub script_url: Option<String>,
    pub search_url: String,
}

pub trait MapWidget: Send + Sync {
    fn render(&self, center: GeoPoint, marker: Option<MapMarker>) -> MapView;
}

#[derive(Debug, Clone)]
pub struct EmbedMapWidget {
    api_key: Option<String>,
    script_base: String,
    map_id: String,
    zoom: u8,
}

impl EmbedMapWidget {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            api_key: config
                .api_key
                .clone()
                .filter(|value| !value.trim().is_empty()),
            script_base: config.script_base.clone(),
            map_id: config.map_id.clone(),
            zoom: config.zoom,
        }
    }

    fn script_url(&self) -> Option<String> {
        let key = self.api_key.as_ref()?;
        Some(format!(
            "{}?key={}&v=weekly&callback=initMap",
            self.script_base.trim_end_matches('/'),
            urlencoding::encode(key)
        ))
    }
}

impl MapWidget for EmbedMapWidget {
    fn render(&self, center: GeoPoint, marker: Option<MapMarker>) -> MapView {
        MapView {
            center,
            zoom: self.zoom,
            map_id: self.map_id.clone(),
            marker,
            script_url: self.script_url(),
            search_url: search_url(center),
        }
    }
}

pub fn search_url(point: GeoPoint) -> String {
    let query = format!("{},{}", point.lat, point.lng);
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        urlencoding::encode(&query)
    )
}
