use crate::app::time_resolver::ClockTime;
use crate::constants::*;
use crate::models::Coordinates;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub routing_api_url: String,
    pub map: MapConfig,
    /// Departure used in manual time mode when the field is left blank
    pub default_departure: ClockTime,
    /// Fixed position answered to geolocation requests; `None` means the host
    /// has no geolocation capability
    pub gps_fix: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Centre the view resets to
    pub center: Coordinates,
    pub zoom: u8,
    /// Radius of the clickable disk for POIs without a polygon
    pub hit_radius_m: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: Coordinates {
                lat: DEFAULT_MAP_CENTER_LAT,
                lon: DEFAULT_MAP_CENTER_LON,
            },
            zoom: DEFAULT_MAP_ZOOM,
            hit_radius_m: DEFAULT_HIT_RADIUS_METERS,
        }
    }
}

impl MapConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let lat: f64 = env::var("MAP_CENTER_LAT")
            .unwrap_or_else(|_| defaults.center.lat.to_string())
            .parse()
            .map_err(|_| "Invalid MAP_CENTER_LAT")?;
        let lon: f64 = env::var("MAP_CENTER_LON")
            .unwrap_or_else(|_| defaults.center.lon.to_string())
            .parse()
            .map_err(|_| "Invalid MAP_CENTER_LON")?;
        let center = Coordinates::new(lat, lon)?;

        let zoom: u8 = env::var("MAP_ZOOM")
            .unwrap_or_else(|_| defaults.zoom.to_string())
            .parse()
            .map_err(|_| "Invalid MAP_ZOOM")?;

        let hit_radius_m: f64 = env::var("HIT_RADIUS_M")
            .unwrap_or_else(|_| defaults.hit_radius_m.to_string())
            .parse()
            .map_err(|_| "Invalid HIT_RADIUS_M")?;

        if !(1.0..=MAX_HIT_RADIUS_METERS).contains(&hit_radius_m) {
            return Err(format!(
                "HIT_RADIUS_M must be between 1 and {} meters",
                MAX_HIT_RADIUS_METERS
            ));
        }

        Ok(Self {
            center,
            zoom,
            hit_radius_m,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let default_departure: ClockTime = env::var("DEFAULT_DEPARTURE")
            .unwrap_or_else(|_| DEFAULT_DEPARTURE.to_string())
            .parse()
            .map_err(|e| format!("Invalid DEFAULT_DEPARTURE: {}", e))?;

        let gps_fix = match env::var("GPS_FIX") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.parse::<Coordinates>()
                    .map_err(|e| format!("Invalid GPS_FIX: {}", e))?,
            ),
            _ => None,
        };

        Ok(Config {
            routing_api_url: env::var("ROUTING_API_URL")
                .unwrap_or_else(|_| DEFAULT_ROUTING_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            map: MapConfig::from_env()?,
            default_departure,
            gps_fix,
        })
    }

    pub fn geolocation_supported(&self) -> bool {
        self.gps_fix.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "ROUTING_API_URL",
        "MAP_CENTER_LAT",
        "MAP_CENTER_LON",
        "MAP_ZOOM",
        "HIT_RADIUS_M",
        "DEFAULT_DEPARTURE",
        "GPS_FIX",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn set(var: &str, value: &str) {
        env::set_var(var, value);
    }

    #[test]
    #[serial]
    fn defaults_when_unset() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.routing_api_url, DEFAULT_ROUTING_API_URL);
        assert_eq!(config.map, MapConfig::default());
        assert_eq!(config.default_departure.to_string(), "08:00");
        assert!(config.gps_fix.is_none());
        assert!(!config.geolocation_supported());
    }

    #[test]
    #[serial]
    fn overrides_from_env() {
        clear_env();
        set("ROUTING_API_URL", "http://routing.local:8080/");
        set("MAP_ZOOM", "17");
        set("HIT_RADIUS_M", "35");
        set("DEFAULT_DEPARTURE", "9:30");
        set("GPS_FIX", "31.3170,121.3900");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.routing_api_url, "http://routing.local:8080");
        assert_eq!(config.map.zoom, 17);
        assert_eq!(config.map.hit_radius_m, 35.0);
        assert_eq!(config.default_departure.to_string(), "09:30");
        assert_eq!(
            config.gps_fix,
            Some(Coordinates {
                lat: 31.3170,
                lon: 121.3900
            })
        );
        assert!(config.geolocation_supported());
    }

    #[test]
    #[serial]
    fn rejects_out_of_range_hit_radius() {
        clear_env();
        set("HIT_RADIUS_M", "0");
        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn rejects_malformed_departure() {
        clear_env();
        set("DEFAULT_DEPARTURE", "25:00");
        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
