use crate::error::GeolocationError;
use crate::models::Coordinates;
use async_trait::async_trait;

/// The host's positioning capability
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Answers with a position fixed at startup (`GPS_FIX`), or fails when none
/// was configured.
#[derive(Debug, Clone, Default)]
pub struct FixedGeolocator {
    fix: Option<Coordinates>,
}

impl FixedGeolocator {
    pub fn new(fix: Option<Coordinates>) -> Self {
        FixedGeolocator { fix }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        match self.fix {
            Some(position) => {
                tracing::debug!(lat = position.lat, lon = position.lon, "Geolocation fix");
                Ok(position)
            }
            None => Err(GeolocationError::Unavailable(
                "no position source configured".to_string(),
            )),
        }
    }
}
