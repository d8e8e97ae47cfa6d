use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, String> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && lat.abs() <= 90.0
            && lon.abs() <= 180.0;
        if !valid {
            return Err(format!("Coordinates out of range: ({}, {})", lat, lon));
        }
        Ok(Coordinates { lat, lon })
    }

    /// Build from a backend `[lat, lon]` pair, the order the routing service
    /// uses for paths and polygon rings.
    pub fn from_pair(pair: [f64; 2]) -> Result<Self, String> {
        Self::new(pair[0], pair[1])
    }

    /// Great-circle distance in meters
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let (phi1, phi2) = (self.lat.to_radians(), other.lat.to_radians());
        let half_dphi = (phi2 - phi1) / 2.0;
        let half_dlambda = (other.lon - self.lon).to_radians() / 2.0;

        let h = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);
        2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
    }

    /// `lat,lon` as the tour endpoint expects it inside its pipe-delimited list
    pub fn to_query_pair(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }

    /// GeoJSON position order: `[lon, lat]`
    pub fn to_position(&self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }
}

impl std::str::FromStr for Coordinates {
    type Err = String;

    /// Parses `lat,lon` (whitespace tolerated around both numbers)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected 'lat,lon', got '{}'", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude in '{}'", s))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude in '{}'", s))?;
        Coordinates::new(lat, lon)
    }
}

/// Axis-aligned box in lat/lon degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl Bounds {
    /// Bounding box of a path, `None` when the path is empty
    pub fn of_path(path: &[Coordinates]) -> Option<Self> {
        use geo::BoundingRect;

        let line: geo::LineString<f64> = path.iter().map(|c| (c.lon, c.lat)).collect();
        let rect = line.bounding_rect()?;
        Some(Bounds {
            south_west: Coordinates {
                lat: rect.min().y,
                lon: rect.min().x,
            },
            north_east: Coordinates {
                lat: rect.max().y,
                lon: rect.max().x,
            },
        })
    }

    /// Grow the box by `ratio` of its height and width on every side
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lon_buffer = (self.north_east.lon - self.south_west.lon).abs() * ratio;
        Bounds {
            south_west: Coordinates {
                lat: self.south_west.lat - lat_buffer,
                lon: self.south_west.lon - lon_buffer,
            },
            north_east: Coordinates {
                lat: self.north_east.lat + lat_buffer,
                lon: self.north_east.lon + lon_buffer,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Coordinates::new(31.3166, 121.3895).is_ok());
        assert!(Coordinates::new(90.5, 121.0).is_err());
        assert!(Coordinates::new(31.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 121.0).is_err());
    }

    #[test]
    fn test_campus_scale_distance() {
        let gate = Coordinates::new(31.3200, 121.3950).unwrap();
        let north = Coordinates::new(31.3210, 121.3950).unwrap();

        // 0.001 degree of latitude is about 111 m
        assert!((gate.distance_to(&north) - 111.2).abs() < 0.5);
        assert_eq!(gate.distance_to(&gate), 0.0);
    }

    #[test]
    fn test_parse_lat_lon() {
        let c: Coordinates = "31.3166, 121.3895".parse().unwrap();
        assert_eq!(c.lat, 31.3166);
        assert_eq!(c.lon, 121.3895);

        assert!("31.3166".parse::<Coordinates>().is_err());
        assert!("abc,1.0".parse::<Coordinates>().is_err());
        assert!("95.0,1.0".parse::<Coordinates>().is_err());
    }

    #[test]
    fn test_bounds_of_path_and_padding() {
        let path = vec![
            Coordinates::new(31.0, 121.0).unwrap(),
            Coordinates::new(31.2, 121.5).unwrap(),
            Coordinates::new(31.1, 121.1).unwrap(),
        ];
        let bounds = Bounds::of_path(&path).unwrap();
        assert_eq!(bounds.south_west, Coordinates { lat: 31.0, lon: 121.0 });
        assert_eq!(bounds.north_east, Coordinates { lat: 31.2, lon: 121.5 });

        let padded = bounds.pad(0.2);
        assert!((padded.south_west.lat - 30.96).abs() < 1e-9);
        assert!((padded.north_east.lat - 31.24).abs() < 1e-9);
        assert!((padded.south_west.lon - 120.9).abs() < 1e-9);
        assert!((padded.north_east.lon - 121.6).abs() < 1e-9);

        assert!(Bounds::of_path(&[]).is_none());
    }
}
