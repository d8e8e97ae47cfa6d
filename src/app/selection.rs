//! Selection state: the active planner mode and the chosen points.
//!
//! This is the only place selection data is mutated. Both modes keep their
//! own sub-state; switching modes never clears the inactive one.

use crate::models::{PlanMode, Poi};
use std::fmt;
use std::str::FromStr;

/// A single-POI selection slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    StandardStart,
    StandardEnd,
    TourStart,
}

impl Slot {
    /// Mode whose sub-state owns this slot
    pub fn mode(&self) -> PlanMode {
        match self {
            Slot::StandardStart | Slot::StandardEnd => PlanMode::Standard,
            Slot::TourStart => PlanMode::Tour,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::StandardStart => write!(f, "start"),
            Slot::StandardEnd => write!(f, "end"),
            Slot::TourStart => write!(f, "tour-start"),
        }
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(Slot::StandardStart),
            "end" => Ok(Slot::StandardEnd),
            "tour-start" | "tour_start" => Ok(Slot::TourStart),
            _ => Err(format!("Invalid slot: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardSelection {
    pub start: Option<Poi>,
    pub end: Option<Poi>,
}

impl StandardSelection {
    /// Both endpoints, if the pair is complete
    pub fn endpoints(&self) -> Option<(&Poi, &Poi)> {
        Some((self.start.as_ref()?, self.end.as_ref()?))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourSelection {
    pub start: Option<Poi>,
    /// Insertion-ordered, unique by name
    pub stops: Vec<Poi>,
}

impl TourSelection {
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && !self.stops.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    mode: PlanMode,
    standard: StandardSelection,
    tour: TourSelection,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PlanMode {
        self.mode
    }

    pub fn standard(&self) -> &StandardSelection {
        &self.standard
    }

    pub fn tour(&self) -> &TourSelection {
        &self.tour
    }

    pub fn point(&self, slot: Slot) -> Option<&Poi> {
        match slot {
            Slot::StandardStart => self.standard.start.as_ref(),
            Slot::StandardEnd => self.standard.end.as_ref(),
            Slot::TourStart => self.tour.start.as_ref(),
        }
    }

    /// Replace a slot. `None` clears it.
    pub fn set_point(&mut self, slot: Slot, poi: Option<Poi>) {
        tracing::debug!(
            slot = %slot,
            poi = poi.as_ref().map(|p| p.name.as_str()).unwrap_or("-"),
            "Set {} to {:?}",
            slot,
            poi.as_ref().map(|p| &p.name)
        );
        match slot {
            Slot::StandardStart => self.standard.start = poi,
            Slot::StandardEnd => self.standard.end = poi,
            Slot::TourStart => self.tour.start = poi,
        }
    }

    /// Append a tour stop unless one with the same name is already present.
    /// Returns whether the list changed.
    pub fn add_tour_stop(&mut self, poi: Poi) -> bool {
        if self.tour.stops.iter().any(|s| s.name == poi.name) {
            tracing::debug!("Tour stop '{}' already present", poi.name);
            return false;
        }
        tracing::debug!(stops = self.tour.stops.len() + 1, "Added tour stop '{}'", poi.name);
        self.tour.stops.push(poi);
        true
    }

    /// Remove the stop at `index`. Out-of-range indices are ignored.
    /// Returns the removed stop.
    pub fn remove_tour_stop(&mut self, index: usize) -> Option<Poi> {
        if index >= self.tour.stops.len() {
            tracing::debug!(
                index,
                stops = self.tour.stops.len(),
                "Ignoring removal of tour stop {} (out of range)",
                index
            );
            return None;
        }
        Some(self.tour.stops.remove(index))
    }

    pub fn set_mode(&mut self, mode: PlanMode) {
        self.mode = mode;
    }

    /// Whether the active mode has enough points for its route query
    pub fn is_query_ready(&self) -> bool {
        match self.mode {
            PlanMode::Standard => self.standard.endpoints().is_some(),
            PlanMode::Tour => self.tour.is_complete(),
        }
    }

    /// Back to the initial state: standard mode, nothing selected
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    fn poi(name: &str) -> Poi {
        Poi::new(name, Coordinates { lat: 31.3, lon: 121.3 })
    }

    #[test]
    fn mode_switch_preserves_inactive_sub_state() {
        let mut state = SelectionState::new();
        state.set_point(Slot::StandardStart, Some(poi("Library")));

        state.set_mode(PlanMode::Tour);
        state.set_point(Slot::TourStart, Some(poi("Gym")));
        state.set_mode(PlanMode::Standard);

        assert_eq!(state.point(Slot::StandardStart).unwrap().name, "Library");
        assert_eq!(state.point(Slot::TourStart).unwrap().name, "Gym");
    }

    #[test]
    fn add_tour_stop_is_idempotent_on_name() {
        let mut state = SelectionState::new();
        assert!(state.add_tour_stop(poi("Canteen")));
        assert!(!state.add_tour_stop(poi("Canteen")));
        assert_eq!(state.tour().stops.len(), 1);
    }

    #[test]
    fn remove_tour_stop_out_of_range_is_noop() {
        let mut state = SelectionState::new();
        state.add_tour_stop(poi("A"));
        state.add_tour_stop(poi("B"));

        assert!(state.remove_tour_stop(5).is_none());
        assert_eq!(state.tour().stops.len(), 2);

        let removed = state.remove_tour_stop(0).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(state.tour().stops[0].name, "B");
    }

    #[test]
    fn query_readiness_per_mode() {
        let mut state = SelectionState::new();
        state.set_point(Slot::StandardStart, Some(poi("A")));
        assert!(!state.is_query_ready());
        state.set_point(Slot::StandardEnd, Some(poi("B")));
        assert!(state.is_query_ready());

        state.set_mode(PlanMode::Tour);
        state.set_point(Slot::TourStart, Some(poi("A")));
        assert!(!state.is_query_ready());
        state.add_tour_stop(poi("C"));
        assert!(state.is_query_ready());
    }

    #[test]
    fn set_point_accepts_none() {
        let mut state = SelectionState::new();
        state.set_point(Slot::StandardEnd, Some(poi("B")));
        state.set_point(Slot::StandardEnd, None);
        assert!(state.point(Slot::StandardEnd).is_none());
    }

    #[test]
    fn slot_parsing() {
        assert_eq!("start".parse::<Slot>().unwrap(), Slot::StandardStart);
        assert_eq!("tour-start".parse::<Slot>().unwrap(), Slot::TourStart);
        assert!("middle".parse::<Slot>().is_err());
        assert_eq!(Slot::TourStart.mode(), PlanMode::Tour);
    }
}
