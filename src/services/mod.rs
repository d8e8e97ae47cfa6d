pub mod geolocation;
pub mod routing;

pub use geolocation::{FixedGeolocator, Geolocator};
pub use routing::{HttpRoutingClient, PathQuery, RoutingBackend, TourQuery};
