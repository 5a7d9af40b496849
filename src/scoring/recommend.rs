use serde::{Deserialize, Serialize};

use crate::scoring::Rating;
use crate::{clamp_percent, LocationMetric};

pub const DEFAULT_TOP_PICKS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub star: f64,
    pub clear_sky: f64,
    pub darkness: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            star: 0.6,
            clear_sky: 0.25,
            darkness: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub score: u8,
    pub star_score: u8,
    pub rating: Rating,
}

#[derive(Debug, Clone)]
pub struct RecommendationScorer {
    weights: ScoreWeights,
}

impl Default for RecommendationScorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

impl RecommendationScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, location: &LocationMetric) -> u8 {
        let mut score = 0.0;

        score += location.star_score as f64 * self.weights.star;
        score += (100.0 - location.cloud_cover as f64) * self.weights.clear_sky;
        score += (100.0 - location.light_pollution as f64) * self.weights.darkness;

        clamp_percent(score)
    }

    /// All locations, best first. Equal scores keep their collection order.
    pub fn rank(&self, locations: &[LocationMetric]) -> Vec<Recommendation> {
        let mut ranked: Vec<Recommendation> = locations
            .iter()
            .map(|location| Recommendation {
                id: location.id.clone(),
                name: location.name.clone(),
                score: self.score(location),
                star_score: location.star_score,
                rating: Rating::from_score(location.star_score),
            })
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    pub fn top_picks(&self, locations: &[LocationMetric], limit: usize) -> Vec<Recommendation> {
        let mut ranked = self.rank(locations);
        ranked.truncate(limit);
        ranked
    }
}

pub fn recommendation_score(location: &LocationMetric) -> u8 {
    RecommendationScorer::default().score(location)
}

pub fn rank_recommendations(locations: &[LocationMetric]) -> Vec<Recommendation> {
    RecommendationScorer::default().rank(locations)
}
