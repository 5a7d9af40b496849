use chrono::{TimeZone, Utc};
use skywatch::catalog::{seed, Dataset};
use skywatch::scoring::{
    bortle_class, light_pollution_from_bortle, rank_recommendations, rating,
    recommendation_score, ConditionBand, Rating, RecommendationScorer, ScoreWeights, Seeing,
    SkyBrightness,
};
use skywatch::{Conditions, LocationMetric};

fn location(id: &str, star: i32, cloud: i32, light: i32) -> LocationMetric {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();
    LocationMetric::new(id, id, 21.0, 81.0, Conditions::clamped(star, cloud, light), now)
}

#[test]
fn rating_boundaries() {
    let cases = [
        (100, Rating::Excellent),
        (85, Rating::Excellent),
        (84, Rating::Great),
        (70, Rating::Great),
        (69, Rating::Good),
        (50, Rating::Good),
        (49, Rating::Fair),
        (30, Rating::Fair),
        (29, Rating::Poor),
        (0, Rating::Poor),
    ];
    for (score, expected) in cases {
        assert_eq!(rating(score), expected, "score {}", score);
    }
    assert_eq!(Rating::Great.label(), "Great");
}

#[test]
fn rating_covers_every_score_with_monotone_bands() {
    let order = |r: Rating| match r {
        Rating::Poor => 0,
        Rating::Fair => 1,
        Rating::Good => 2,
        Rating::Great => 3,
        Rating::Excellent => 4,
    };
    let mut previous = 0;
    for score in 0..=100u8 {
        let current = order(rating(score));
        assert!(current >= previous);
        previous = current;
    }
    assert_eq!(previous, 4);
}

#[test]
fn recommendation_score_matches_weighted_formula() {
    assert_eq!(recommendation_score(&location("raipur", 62, 20, 70)), 62);
    assert_eq!(recommendation_score(&location("bilaspur", 75, 10, 45)), 76);
    assert_eq!(recommendation_score(&location("jashpur", 88, 5, 12)), 90);
    assert_eq!(recommendation_score(&location("best", 100, 0, 0)), 100);
    assert_eq!(recommendation_score(&location("worst", 0, 100, 100)), 0);
}

#[test]
fn recommendation_score_stays_in_range() {
    for star in (0..=100).step_by(5) {
        for cloud in (0..=100).step_by(5) {
            for light in (0..=100).step_by(5) {
                let l = location("x", star, cloud, light);
                let first = recommendation_score(&l);
                assert!(first <= 100);
                assert_eq!(first, recommendation_score(&l));
            }
        }
    }
}

#[test]
fn custom_weights_are_clamped() {
    let scorer = RecommendationScorer::new(ScoreWeights {
        star: 1.0,
        clear_sky: 1.0,
        darkness: 1.0,
    });
    assert_eq!(scorer.score(&location("x", 100, 0, 0)), 100);
}

#[test]
fn ranking_orders_seeded_observatories() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();
    let ranked = rank_recommendations(&seed(Dataset::Observatories, now));
    let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["jashpur", "bastar", "bilaspur", "raipur"]);
    let scores: Vec<u8> = ranked.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![90, 82, 76, 62]);
    assert_eq!(ranked[0].rating, Rating::Excellent);
}

#[test]
fn ranking_orders_seeded_sites() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap();
    let ranked = rank_recommendations(&seed(Dataset::Sites, now));
    let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["chitrakote", "mainpat", "barnawapara", "raipur-city"]);
}

#[test]
fn ranking_is_stable_for_equal_scores() {
    let locations = vec![
        location("low", 10, 90, 90),
        location("first", 70, 20, 30),
        location("second", 70, 20, 30),
        location("third", 70, 20, 30),
    ];
    let ranked = rank_recommendations(&locations);
    let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third", "low"]);
}

#[test]
fn top_picks_truncates_ranking() {
    let locations = vec![
        location("a", 10, 50, 50),
        location("b", 90, 5, 5),
        location("c", 50, 50, 50),
    ];
    let picks = RecommendationScorer::default().top_picks(&locations, 2);
    assert_eq!(picks.len(), 2);
    assert_eq!(picks[0].id, "b");
    assert_eq!(picks[1].id, "c");
}

#[test]
fn bortle_classes_follow_light_pollution() {
    assert_eq!(bortle_class(0), 1);
    assert_eq!(bortle_class(12), 2);
    assert_eq!(bortle_class(70), 7);
    assert_eq!(bortle_class(100), 9);
    for class in 1..=9u8 {
        assert_eq!(bortle_class(light_pollution_from_bortle(class)), class);
    }
    assert_eq!(light_pollution_from_bortle(0), 0);
    assert_eq!(light_pollution_from_bortle(12), 100);
}

#[test]
fn descriptive_bands() {
    assert_eq!(ConditionBand::from_score(80), ConditionBand::Favorable);
    assert_eq!(ConditionBand::from_score(79), ConditionBand::Moderate);
    assert_eq!(ConditionBand::from_score(49), ConditionBand::Unfavorable);
    assert_eq!(Seeing::from_score(81), Seeing::Stable);
    assert_eq!(Seeing::from_score(80), Seeing::Turbulent);
    assert_eq!(SkyBrightness::from_bortle(3), SkyBrightness::Dark);
    assert_eq!(SkyBrightness::from_bortle(5), SkyBrightness::Suburban);
    assert_eq!(SkyBrightness::from_bortle(8), SkyBrightness::Urban);
}

#[test]
fn constructor_clamps_conditions() {
    let location = location("edge", 140, -5, 100);
    assert_eq!(
        location.conditions(),
        Conditions {
            star_score: 100,
            cloud_cover: 0,
            light_pollution: 100,
        }
    );
}
