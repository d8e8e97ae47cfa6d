pub mod coordinates;
pub mod poi;
pub mod route;

pub use coordinates::{Bounds, Coordinates};
pub use poi::{Poi, PoiCatalog, RawPoi};
pub use route::{
    LegResult, PathOutcome, PathResult, PlanMode, RouteOutcome, TourOutcome, TourResult,
    TravelMode,
};
