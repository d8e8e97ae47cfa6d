use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walk,
    Bike,
}

impl TravelMode {
    pub fn label(&self) -> &'static str {
        match self {
            TravelMode::Walk => "walking",
            TravelMode::Bike => "cycling",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TravelMode::Walk => write!(f, "walk"),
            TravelMode::Bike => write!(f, "bike"),
        }
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walk" | "walking" => Ok(TravelMode::Walk),
            "bike" | "cycling" | "bicycle" => Ok(TravelMode::Bike),
            _ => Err(format!("Invalid travel mode: '{}'", s)),
        }
    }
}

/// Which planner tab is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlanMode {
    /// Point-to-point between one start and one end
    #[default]
    Standard,
    /// Multi-stop tour from one start
    Tour,
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanMode::Standard => write!(f, "standard"),
            PlanMode::Tour => write!(f, "tour"),
        }
    }
}

impl FromStr for PlanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "route" => Ok(PlanMode::Standard),
            "tour" => Ok(PlanMode::Tour),
            _ => Err(format!("Invalid plan mode: '{}'", s)),
        }
    }
}

// Routing service response types

/// One travel mode's leg inside a `/api/find_path` response.
/// The service reports "no path" as `dist == time == -1` with an empty path.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LegResult {
    #[serde(default)]
    pub path: Vec<[f64; 2]>, // [lat, lon] pairs
    pub dist: f64, // meters
    pub time: f64, // seconds
}

impl LegResult {
    pub fn is_reachable(&self) -> bool {
        self.time >= 0.0 && self.dist >= 0.0
    }

    pub fn to_coordinates(&self) -> Vec<Coordinates> {
        pairs_to_coordinates(&self.path)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PathResult {
    pub walk: LegResult,
    pub bike: LegResult,
    #[serde(default = "default_traffic_multiplier")]
    pub traffic_multiplier: f64,
    #[serde(default)]
    pub recommendation: Option<TravelMode>,
}

impl PathResult {
    pub fn leg(&self, mode: TravelMode) -> &LegResult {
        match mode {
            TravelMode::Walk => &self.walk,
            TravelMode::Bike => &self.bike,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TourResult {
    #[serde(default)]
    pub path: Vec<[f64; 2]>, // [lat, lon] pairs
    /// Solved visiting order as POI names
    pub sequence: Vec<String>,
    pub dist: f64,
    pub time: f64,
    #[serde(default = "default_traffic_multiplier")]
    pub traffic_multiplier: f64,
}

impl TourResult {
    pub fn to_coordinates(&self) -> Vec<Coordinates> {
        pairs_to_coordinates(&self.path)
    }
}

fn default_traffic_multiplier() -> f64 {
    1.0
}

fn pairs_to_coordinates(pairs: &[[f64; 2]]) -> Vec<Coordinates> {
    pairs
        .iter()
        .filter_map(|pair| Coordinates::from_pair(*pair).ok())
        .collect()
}

/// Either a computed route or the service's explicit refusal (`error` field).
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome<T> {
    Found(T),
    Unreachable(String),
}

pub type PathOutcome = RouteOutcome<PathResult>;
pub type TourOutcome = RouteOutcome<TourResult>;
