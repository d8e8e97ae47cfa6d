//! Fixed values shared across the client.
//!
//! Rendering sizes, colours and default fallbacks for env-var-based
//! configuration. For values a deployment may want to change, see
//! [`Config`](crate::config::Config) instead.

// --- Config defaults (used when env vars are absent) ---

/// Default routing service base URL. Overridden by `ROUTING_API_URL`.
pub const DEFAULT_ROUTING_API_URL: &str = "http://127.0.0.1:5000";
/// Default map centre latitude. Overridden by `MAP_CENTER_LAT`.
pub const DEFAULT_MAP_CENTER_LAT: f64 = 31.3166;
/// Default map centre longitude. Overridden by `MAP_CENTER_LON`.
pub const DEFAULT_MAP_CENTER_LON: f64 = 121.3895;
/// Default map zoom level. Overridden by `MAP_ZOOM`.
pub const DEFAULT_MAP_ZOOM: u8 = 16;
/// Departure time used in manual mode when the field is blank.
/// Overridden by `DEFAULT_DEPARTURE`.
pub const DEFAULT_DEPARTURE: &str = "08:00";

// --- Hit-test layer ---

/// Radius (meters) of the clickable disk around POIs without a polygon.
/// Overridden by `HIT_RADIUS_M` (validated 1..=500).
pub const DEFAULT_HIT_RADIUS_METERS: f64 = 20.0;
pub const MAX_HIT_RADIUS_METERS: f64 = 500.0;

// --- Highlight / route styling ---

/// Screen radius (pixels) of the highlight circle for point POIs.
pub const HIGHLIGHT_MARKER_RADIUS_PX: f64 = 10.0;
pub const HIGHLIGHT_POLYGON_FILL_OPACITY: f64 = 0.4;
pub const HIGHLIGHT_MARKER_FILL_OPACITY: f64 = 0.6;
pub const PIN_OPACITY: f64 = 0.9;
pub const ROUTE_LINE_WEIGHT: f64 = 6.0;
/// Fraction of the route bbox added on every side when fitting the viewport.
pub const ROUTE_FIT_PADDING: f64 = 0.2;

// --- Synthesised POIs ---

/// Name given to the POI built from a geolocation fix.
pub const GPS_POI_NAME: &str = "My location";
