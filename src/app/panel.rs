//! Result panel text for both planner modes.

use crate::app::time_resolver::ClockTime;
use crate::models::{PathResult, TourResult, TravelMode};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum StandardPanel {
    /// Placeholder shown until both endpoints are set
    #[default]
    Prompt,
    Locating,
    LocateFailed,
    Computing,
    Unreachable,
    Result(StandardSummary),
}

impl fmt::Display for StandardPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardPanel::Prompt => write!(f, "Select a start and an end"),
            StandardPanel::Locating => write!(f, "Locating..."),
            StandardPanel::LocateFailed => write!(f, "Location failed"),
            StandardPanel::Computing => write!(f, "Computing..."),
            StandardPanel::Unreachable => write!(f, "No route available"),
            StandardPanel::Result(summary) => write!(f, "{}", summary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TourPanel {
    #[default]
    Empty,
    /// Start or stops missing when planning was requested
    Incomplete,
    LocateFailed,
    Planning,
    Unreachable,
    Result(TourSummary),
}

impl fmt::Display for TourPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourPanel::Empty => Ok(()),
            TourPanel::Incomplete => write!(f, "Add a start and at least one stop"),
            TourPanel::LocateFailed => write!(f, "Location failed"),
            TourPanel::Planning => write!(f, "Planning..."),
            TourPanel::Unreachable => write!(f, "No route available"),
            TourPanel::Result(summary) => write!(f, "{}", summary),
        }
    }
}

/// Congestion multiplier worth flagging: cycling only, and only above 1.0
fn congestion_tag(mode: TravelMode, multiplier: f64) -> Option<f64> {
    (mode == TravelMode::Bike && multiplier > 1.0).then_some(multiplier)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardSummary {
    pub travel_mode: TravelMode,
    pub departure: ClockTime,
    pub distance_km: f64,
    pub duration_min: f64,
    pub congestion: Option<f64>,
    pub arrival: ClockTime,
    pub walk_min: f64,
    pub bike_min: f64,
    pub recommendation: Option<TravelMode>,
}

impl StandardSummary {
    pub fn new(result: &PathResult, travel_mode: TravelMode, departure: ClockTime) -> Self {
        let leg = result.leg(travel_mode);
        StandardSummary {
            travel_mode,
            departure,
            distance_km: leg.dist / 1000.0,
            duration_min: leg.time / 60.0,
            congestion: congestion_tag(travel_mode, result.traffic_multiplier),
            arrival: departure.arrival_after(leg.time),
            walk_min: result.walk.time / 60.0,
            bike_min: result.bike.time / 60.0,
            recommendation: result.recommendation,
        }
    }
}

impl fmt::Display for StandardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mode: {} (departing {})",
            self.travel_mode.label(),
            self.departure
        )?;
        writeln!(f, "Distance: {:.2} km", self.distance_km)?;
        write!(f, "Duration: {:.1} min", self.duration_min)?;
        if let Some(multiplier) = self.congestion {
            write!(f, " [congested x{:.1}]", multiplier)?;
        }
        writeln!(f)?;
        writeln!(f, "Arrival: {}", self.arrival)?;
        write!(
            f,
            "Reference: walk {:.1} min | bike {:.1} min",
            self.walk_min, self.bike_min
        )?;
        if let Some(recommended) = self.recommendation {
            write!(f, " (recommended: {})", recommended.label())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TourSummary {
    pub travel_mode: TravelMode,
    /// Solved visiting order, one list item per name
    pub sequence: Vec<String>,
    pub duration_min: f64,
    pub congestion: Option<f64>,
    pub completion: ClockTime,
    pub distance_km: f64,
}

impl TourSummary {
    pub fn new(result: &TourResult, travel_mode: TravelMode, departure: ClockTime) -> Self {
        TourSummary {
            travel_mode,
            sequence: result.sequence.clone(),
            duration_min: result.time / 60.0,
            congestion: congestion_tag(travel_mode, result.traffic_multiplier),
            completion: departure.arrival_after(result.time),
            distance_km: result.dist / 1000.0,
        }
    }
}

impl fmt::Display for TourSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Visiting order:")?;
        for (i, name) in self.sequence.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, name)?;
        }
        write!(f, "Total time: {:.1} min", self.duration_min)?;
        if let Some(multiplier) = self.congestion {
            write!(f, " (incl. congestion x{:.1})", multiplier)?;
        }
        writeln!(f)?;
        writeln!(f, "Completion: {}", self.completion)?;
        write!(f, "Total distance: {:.2} km", self.distance_km)
    }
}
