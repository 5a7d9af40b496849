use serde::{Deserialize, Serialize};

use crate::clamp_percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Great,
    Good,
    Fair,
    Poor,
}

impl Rating {
    pub fn from_score(score: u8) -> Self {
        if score >= 85 {
            Rating::Excellent
        } else if score >= 70 {
            Rating::Great
        } else if score >= 50 {
            Rating::Good
        } else if score >= 30 {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Great => "Great",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Poor => "Poor",
        }
    }
}

pub fn rating(star_score: u8) -> Rating {
    Rating::from_score(star_score)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionBand {
    Favorable,
    Moderate,
    Unfavorable,
}

impl ConditionBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ConditionBand::Favorable
        } else if score >= 50 {
            ConditionBand::Moderate
        } else {
            ConditionBand::Unfavorable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConditionBand::Favorable => "favorable",
            ConditionBand::Moderate => "moderate",
            ConditionBand::Unfavorable => "unfavorable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeing {
    Stable,
    Turbulent,
}

impl Seeing {
    pub fn from_score(star_score: u8) -> Self {
        if star_score > 80 {
            Seeing::Stable
        } else {
            Seeing::Turbulent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Seeing::Stable => "Stable",
            Seeing::Turbulent => "Turbulent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyBrightness {
    Dark,
    Suburban,
    Urban,
}

impl SkyBrightness {
    pub fn from_bortle(class: u8) -> Self {
        if class <= 3 {
            SkyBrightness::Dark
        } else if class <= 5 {
            SkyBrightness::Suburban
        } else {
            SkyBrightness::Urban
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkyBrightness::Dark => "dark",
            SkyBrightness::Suburban => "suburban",
            SkyBrightness::Urban => "urban",
        }
    }
}

pub fn bortle_class(light_pollution: u8) -> u8 {
    let lp = light_pollution.min(100) as f64;
    (1.0 + (lp * 8.0 / 100.0).round()) as u8
}

pub fn light_pollution_from_bortle(class: u8) -> u8 {
    let class = class.clamp(1, 9) as f64;
    clamp_percent((class - 1.0) * 100.0 / 8.0)
}
