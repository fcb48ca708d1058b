use std::collections::BTreeSet;

use gtfs::{Route, RouteGeometry, RouteID, RoutePolylines, Stop};

/// A route the user chose to track, with everything needed to draw it
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedRouteEntry {
    pub route: Route,
    pub stops: Vec<Stop>,
    pub polylines: RoutePolylines,
}

impl From<RouteGeometry> for SelectedRouteEntry {
    fn from(geometry: RouteGeometry) -> Self {
        Self {
            route: geometry.route,
            stops: geometry.stops,
            polylines: geometry.polylines,
        }
    }
}

impl SelectedRouteEntry {
    pub fn route_id(&self) -> &RouteID {
        &self.route.route_id
    }
}

/// The routes being tracked, in the order they were picked. At most one entry per route ID.
/// Updates produce a new set; nothing is edited in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionSet {
    entries: Vec<SelectedRouteEntry>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SelectedRouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, route_id: &RouteID) -> bool {
        self.entries.iter().any(|e| e.route_id() == route_id)
    }

    pub fn route_ids(&self) -> BTreeSet<&RouteID> {
        self.entries.iter().map(|e| e.route_id()).collect()
    }

    /// Removes the candidate's route if it's present, otherwise appends the candidate. Everything
    /// else keeps its position.
    pub fn toggle(&self, candidate: SelectedRouteEntry) -> Self {
        let mut entries = self.entries.clone();
        if let Some(idx) = entries
            .iter()
            .position(|e| e.route_id() == candidate.route_id())
        {
            entries.remove(idx);
        } else {
            entries.push(candidate);
        }
        Self { entries }
    }

    /// Later duplicates of a route ID are dropped.
    pub fn replace_all(entries: Vec<SelectedRouteEntry>) -> Self {
        let mut seen = BTreeSet::new();
        let mut result = Vec::new();
        for entry in entries {
            if seen.insert(entry.route_id().clone()) {
                result.push(entry);
            }
        }
        Self { entries: result }
    }

    /// "Select all" when nothing is selected, "clear all" otherwise
    pub fn toggle_all(&self, everything: Vec<SelectedRouteEntry>) -> Self {
        if self.is_empty() {
            Self::replace_all(everything)
        } else {
            Self::new()
        }
    }
}
