use crate::constants::GPS_POI_NAME;
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// A named location on the map, optionally area-shaped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Poi {
    pub name: String,
    pub coordinates: Coordinates,
    /// Outline ring for building-shaped POIs, empty for point POIs
    pub polygon: Vec<Coordinates>,
    /// Synthesised from a geolocation fix rather than loaded from the catalogue
    pub is_gps: bool,
}

impl Poi {
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Poi {
            name: name.into(),
            coordinates,
            polygon: Vec::new(),
            is_gps: false,
        }
    }

    pub fn with_polygon(mut self, polygon: Vec<Coordinates>) -> Self {
        self.polygon = polygon;
        self
    }

    /// Fresh "current location" entry for a geolocation fix
    pub fn current_location(coordinates: Coordinates) -> Self {
        Poi {
            name: GPS_POI_NAME.to_string(),
            coordinates,
            polygon: Vec::new(),
            is_gps: true,
        }
    }

    pub fn has_polygon(&self) -> bool {
        !self.polygon.is_empty()
    }
}

/// POI as served by `/api/locations`, before validation.
#[derive(Debug, Deserialize)]
pub struct RawPoi {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub polygon: Vec<[f64; 2]>,
}

impl RawPoi {
    /// Returns `None` (and logs) when the POI's own coordinates are invalid;
    /// invalid ring vertices are dropped individually.
    pub fn into_poi(self) -> Option<Poi> {
        let coordinates = match Coordinates::new(self.lat, self.lon) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Skipping POI '{}' with invalid coordinates: {}", self.name, e);
                return None;
            }
        };

        let polygon: Vec<Coordinates> = self
            .polygon
            .into_iter()
            .filter_map(|pair| match Coordinates::from_pair(pair) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!("Dropping polygon vertex of '{}': {}", self.name, e);
                    None
                }
            })
            .collect();

        Some(Poi::new(self.name, coordinates).with_polygon(polygon))
    }
}

/// The read-only POI list loaded at startup, looked up by unique name.
#[derive(Debug, Clone, Default)]
pub struct PoiCatalog {
    pois: Vec<Poi>,
}

impl PoiCatalog {
    /// Later duplicates of an already-seen name are dropped.
    pub fn new(pois: Vec<Poi>) -> Self {
        let mut unique: Vec<Poi> = Vec::with_capacity(pois.len());
        for poi in pois {
            if unique.iter().any(|p| p.name == poi.name) {
                tracing::warn!("Duplicate POI name '{}' ignored", poi.name);
                continue;
            }
            unique.push(poi);
        }
        PoiCatalog { pois: unique }
    }

    pub fn find(&self, name: &str) -> Option<&Poi> {
        self.pois.iter().find(|p| p.name == name)
    }

    pub fn all(&self) -> &[Poi] {
        &self.pois
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_poi_conversion() {
        let raw: RawPoi = serde_json::from_value(serde_json::json!({
            "name": "Library",
            "lat": 31.3166,
            "lon": 121.3895,
            "polygon": [[31.3160, 121.3890], [31.3170, 121.3890], [31.3170, 121.3900]]
        }))
        .unwrap();

        let poi = raw.into_poi().unwrap();
        assert_eq!(poi.name, "Library");
        assert_eq!(poi.polygon.len(), 3);
        assert_eq!(poi.polygon[1], Coordinates { lat: 31.3170, lon: 121.3890 });
        assert!(!poi.is_gps);
    }

    #[test]
    fn test_raw_poi_without_polygon() {
        let raw: RawPoi = serde_json::from_value(serde_json::json!({
            "name": "Gate",
            "lat": 31.31,
            "lon": 121.38
        }))
        .unwrap();

        let poi = raw.into_poi().unwrap();
        assert!(!poi.has_polygon());
    }

    #[test]
    fn test_raw_poi_invalid_coordinates_skipped() {
        let raw = RawPoi {
            name: "Nowhere".to_string(),
            lat: 120.0,
            lon: 0.0,
            polygon: vec![],
        };
        assert!(raw.into_poi().is_none());
    }

    #[test]
    fn test_current_location_poi() {
        let poi = Poi::current_location(Coordinates { lat: 1.0, lon: 2.0 });
        assert!(poi.is_gps);
        assert_eq!(poi.name, GPS_POI_NAME);
        assert!(poi.polygon.is_empty());
    }

    #[test]
    fn test_catalog_lookup_and_dedup() {
        let c = Coordinates { lat: 31.0, lon: 121.0 };
        let catalog = PoiCatalog::new(vec![
            Poi::new("A", c),
            Poi::new("B", c),
            Poi::new("A", Coordinates { lat: 0.0, lon: 0.0 }),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("A").unwrap().coordinates, c);
        assert!(catalog.find("C").is_none());
    }
}
