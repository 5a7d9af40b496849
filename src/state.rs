use std::collections::HashSet;
use tracing::warn;

use crate::LocationMetric;

#[derive(Debug, Clone)]
pub struct DashboardState {
    locations: Vec<LocationMetric>,
    selected_id: String,
    filter: String,
}

impl DashboardState {
    pub fn new(locations: Vec<LocationMetric>) -> Result<Self, String> {
        let first = locations
            .first()
            .ok_or_else(|| "dashboard needs at least one location".to_string())?;
        let selected_id = first.id.clone();

        let mut seen = HashSet::new();
        for location in &locations {
            if !seen.insert(location.id.as_str()) {
                return Err(format!("duplicate location id: {}", location.id));
            }
        }

        Ok(Self {
            locations,
            selected_id,
            filter: String::new(),
        })
    }

    pub fn locations(&self) -> &[LocationMetric] {
        &self.locations
    }

    pub fn find(&self, id: &str) -> Option<&LocationMetric> {
        self.locations.iter().find(|location| location.id == id)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn visible_locations(&self) -> Vec<&LocationMetric> {
        filter_by_name(&self.locations, &self.filter)
    }

    pub fn selected_id(&self) -> &str {
        &self.selected_id
    }

    pub fn select(&mut self, id: &str) -> Result<&LocationMetric, String> {
        let index = self
            .locations
            .iter()
            .position(|location| location.id == id)
            .ok_or_else(|| format!("unknown location id: {}", id))?;
        self.selected_id = id.to_string();
        Ok(&self.locations[index])
    }

    pub fn selected(&self) -> &LocationMetric {
        match self.find(&self.selected_id) {
            Some(location) => location,
            None => {
                warn!(selected_id = %self.selected_id, "selected location missing, using first");
                &self.locations[0]
            }
        }
    }

    /// Swaps in a whole new collection from the feed. The ids and their order
    /// must match the current collection; timestamps never move backwards.
    pub fn apply_feed(&mut self, mut next: Vec<LocationMetric>) -> Result<(), String> {
        if next.len() != self.locations.len() {
            return Err(format!(
                "feed produced {} locations, expected {}",
                next.len(),
                self.locations.len()
            ));
        }

        for (current, updated) in self.locations.iter().zip(next.iter_mut()) {
            if current.id != updated.id {
                return Err(format!(
                    "feed changed location id {} to {}",
                    current.id, updated.id
                ));
            }
            updated.last_updated = updated.last_updated.max(current.last_updated);
        }

        self.locations = next;
        Ok(())
    }
}

pub fn filter_by_name<'a>(locations: &'a [LocationMetric], filter: &str) -> Vec<&'a LocationMetric> {
    let needle = filter.to_lowercase();
    locations
        .iter()
        .filter(|location| location.name.to_lowercase().contains(&needle))
        .collect()
}
