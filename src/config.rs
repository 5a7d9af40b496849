use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::Dataset;
use crate::feed::{JitterConfig, MAX_TICK};
use crate::map::GeoPoint;
use crate::scoring::ScoreWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub tick_secs: u64,
    pub seed: Option<u64>,
    pub jitter: JitterConfig,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_secs: 8,
            seed: None,
            jitter: JitterConfig::default(),
        }
    }
}

impl FeedConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs.clamp(1, MAX_TICK.as_secs()))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tick_secs > MAX_TICK.as_secs() {
            return Err(format!(
                "invalid feed tick: {}s (expected at most {}s)",
                self.tick_secs,
                MAX_TICK.as_secs()
            ));
        }
        self.jitter.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub region: String,
    pub dataset: String,
    pub top_picks: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            region: "Chhattisgarh".to_string(),
            dataset: "observatories".to_string(),
            top_picks: 4,
        }
    }
}

impl DashboardConfig {
    pub fn dataset(&self) -> Result<Dataset, String> {
        Dataset::from_str(&self.dataset).ok_or_else(|| format!("invalid dataset: {}", self.dataset))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_ms: u64,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-preview-09-2025".to_string(),
            timeout_ms: 20_000,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub script_base: String,
    pub map_id: String,
    pub zoom: u8,
    pub center: GeoPoint,
    pub marker_title: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            script_base: "https://maps.googleapis.com/maps/api/js".to_string(),
            map_id: "3ab505075eaec773148cc142".to_string(),
            zoom: 15,
            center: GeoPoint { lat: 21.19, lng: 81.3 },
            marker_title: "SkyWatch".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub web_root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            web_root: "web/dist".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkywatchConfig {
    pub dashboard: DashboardConfig,
    pub feed: FeedConfig,
    pub weights: ScoreWeights,
    pub assistant: AssistantConfig,
    pub map: MapConfig,
    pub server: ServerConfig,
}

impl SkywatchConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                SkywatchConfig::default()
            }
        } else {
            SkywatchConfig::default()
        };

        config.apply_env_overrides();
        config.dashboard.dataset()?;
        config.feed.validate()?;
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dataset) = lookup("SKYWATCH_DATASET") {
            self.dashboard.dataset = dataset;
        }
        if let Some(region) = lookup("SKYWATCH_REGION") {
            self.dashboard.region = region;
        }
        if let Some(tick) = lookup("SKYWATCH_TICK_SECS") {
            if let Ok(value) = tick.trim().parse::<u64>() {
                self.feed.tick_secs = value;
            }
        }
        if let Some(seed) = lookup("SKYWATCH_SEED") {
            if let Ok(value) = seed.trim().parse::<u64>() {
                self.feed.seed = Some(value);
            }
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.assistant.api_key = Some(key);
        }
        if let Some(base) = lookup("GEMINI_API_BASE") {
            self.assistant.api_base = base;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.assistant.model = model;
        }
        if let Some(timeout) = lookup("GEMINI_TIMEOUT_MS") {
            if let Ok(value) = timeout.trim().parse::<u64>() {
                self.assistant.timeout_ms = value;
            }
        }
        if let Some(key) = lookup("MAPS_API_KEY") {
            self.map.api_key = Some(key);
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("SKYWATCH_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/skywatch.toml")))
}
