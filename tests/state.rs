use chrono::{DateTime, TimeZone, Utc};
use skywatch::catalog::{seed, Dataset};
use skywatch::state::{filter_by_name, DashboardState};
use skywatch::LocationMetric;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap()
}

fn observatories() -> DashboardState {
    DashboardState::new(seed(Dataset::Observatories, start())).unwrap()
}

fn names(locations: &[&LocationMetric]) -> Vec<String> {
    locations.iter().map(|l| l.name.clone()).collect()
}

#[test]
fn selection_defaults_to_first_location() {
    let state = observatories();
    assert_eq!(state.selected_id(), "raipur");
    assert_eq!(state.selected().name, "Raipur Observatory");
}

#[test]
fn filter_matches_name_substring_case_insensitively() {
    let mut state = observatories();
    state.set_filter("rai");
    assert_eq!(names(&state.visible_locations()), vec!["Raipur Observatory"]);

    state.set_filter("HILLS");
    assert_eq!(names(&state.visible_locations()), vec!["Jashpur Hills"]);

    state.set_filter("pur");
    assert_eq!(
        names(&state.visible_locations()),
        vec!["Raipur Observatory", "Bilaspur Field", "Jashpur Hills"]
    );

    state.set_filter("");
    assert_eq!(state.visible_locations().len(), 4);

    state.set_filter("nowhere");
    assert!(state.visible_locations().is_empty());
}

#[test]
fn filter_does_not_change_selection() {
    let mut state = observatories();
    state.select("bastar").unwrap();
    state.set_filter("rai");
    assert_eq!(state.selected().id, "bastar");
}

#[test]
fn filter_by_name_works_on_plain_slices() {
    let locations = seed(Dataset::Sites, start());
    let found = filter_by_name(&locations, "CITY");
    assert_eq!(names(&found), vec!["Raipur City"]);
}

#[test]
fn select_known_id() {
    let mut state = observatories();
    let selected = state.select("jashpur").unwrap();
    assert_eq!(selected.name, "Jashpur Hills");
    assert_eq!(state.selected_id(), "jashpur");
}

#[test]
fn select_unknown_id_keeps_previous_selection() {
    let mut state = observatories();
    state.select("bilaspur").unwrap();
    let err = state.select("atlantis").unwrap_err();
    assert!(err.contains("atlantis"));
    assert_eq!(state.selected().id, "bilaspur");
}

#[test]
fn rejects_empty_and_duplicate_collections() {
    assert!(DashboardState::new(Vec::new()).is_err());

    let mut locations = seed(Dataset::Observatories, start());
    locations.push(locations[0].clone());
    let err = DashboardState::new(locations).unwrap_err();
    assert!(err.contains("raipur"));
}

#[test]
fn apply_feed_replaces_whole_collection() {
    let mut state = observatories();
    let mut next = state.locations().to_vec();
    for location in next.iter_mut() {
        location.star_score = 10;
        location.last_updated = start() + chrono::Duration::seconds(8);
    }
    state.apply_feed(next.clone()).unwrap();
    assert_eq!(state.locations(), next.as_slice());
}

#[test]
fn apply_feed_rejects_shape_changes() {
    let mut state = observatories();
    let before = state.locations().to_vec();

    let mut shorter = before.clone();
    shorter.pop();
    assert!(state.apply_feed(shorter).is_err());

    let mut renamed = before.clone();
    renamed[1].id = "elsewhere".to_string();
    renamed[0].star_score = 1;
    assert!(state.apply_feed(renamed).is_err());

    assert_eq!(state.locations(), before.as_slice());
}

#[test]
fn apply_feed_keeps_timestamps_monotonic() {
    let mut state = observatories();
    let mut next = state.locations().to_vec();
    for location in next.iter_mut() {
        location.last_updated = start() - chrono::Duration::minutes(5);
    }
    state.apply_feed(next).unwrap();
    assert!(state.locations().iter().all(|l| l.last_updated == start()));
}
