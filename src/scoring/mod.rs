pub mod rating;
pub mod recommend;

pub use rating::{
    bortle_class, light_pollution_from_bortle, rating, ConditionBand, Rating, Seeing,
    SkyBrightness,
};
pub use recommend::{
    rank_recommendations, recommendation_score, Recommendation, RecommendationScorer,
    ScoreWeights, DEFAULT_TOP_PICKS,
};
