//! Invisible clickable regions over every POI.
//!
//! A click inside a region opens a contextual menu whose actions depend on
//! the active mode. The layer keeps no selection state of its own.

use crate::app::selection::Slot;
use crate::models::{Coordinates, PlanMode, Poi, PoiCatalog};
use geo::Contains;

#[derive(Debug, Clone, PartialEq)]
pub enum HitShape {
    /// The POI's own outline ring
    Polygon(Vec<Coordinates>),
    /// Fixed-radius disk around a point POI
    Disk { center: Coordinates, radius_m: f64 },
}

impl HitShape {
    pub fn contains(&self, at: &Coordinates) -> bool {
        match self {
            HitShape::Polygon(ring) => {
                let exterior: geo::LineString<f64> =
                    ring.iter().map(|c| (c.lon, c.lat)).collect();
                let polygon = geo::Polygon::new(exterior, vec![]);
                polygon.contains(&geo::Point::new(at.lon, at.lat))
            }
            HitShape::Disk { center, radius_m } => center.distance_to(at) <= *radius_m,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitArea {
    pub poi: String,
    pub shape: HitShape,
}

#[derive(Debug, Clone, Default)]
pub struct HitTestLayer {
    areas: Vec<HitArea>,
}

impl HitTestLayer {
    /// One area per catalogue POI, polygon if it has one, disk otherwise
    pub fn build(catalog: &PoiCatalog, radius_m: f64) -> Self {
        let areas = catalog
            .all()
            .iter()
            .map(|poi| HitArea {
                poi: poi.name.clone(),
                shape: shape_for(poi, radius_m),
            })
            .collect();
        HitTestLayer { areas }
    }

    pub fn areas(&self) -> &[HitArea] {
        &self.areas
    }

    /// POI under `at`. Overlaps resolve to the last registered area, which
    /// is the one drawn on top.
    pub fn hit(&self, at: &Coordinates) -> Option<&str> {
        self.areas
            .iter()
            .rev()
            .find(|area| area.shape.contains(at))
            .map(|area| area.poi.as_str())
    }
}

fn shape_for(poi: &Poi, radius_m: f64) -> HitShape {
    if poi.has_polygon() {
        HitShape::Polygon(poi.polygon.clone())
    } else {
        HitShape::Disk {
            center: poi.coordinates,
            radius_m,
        }
    }
}

/// Contextual menu action bound to the POI the popup was opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SetPoint(Slot),
    AddStop,
}

impl MenuAction {
    /// Actions offered for a POI in the given mode
    pub fn for_mode(mode: PlanMode) -> Vec<MenuAction> {
        match mode {
            PlanMode::Standard => vec![
                MenuAction::SetPoint(Slot::StandardStart),
                MenuAction::SetPoint(Slot::StandardEnd),
            ],
            PlanMode::Tour => vec![MenuAction::SetPoint(Slot::TourStart), MenuAction::AddStop],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::SetPoint(Slot::StandardStart) | MenuAction::SetPoint(Slot::TourStart) => {
                "Set as start"
            }
            MenuAction::SetPoint(Slot::StandardEnd) => "Set as end",
            MenuAction::AddStop => "Add as stop",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub poi: String,
    pub at: Coordinates,
    pub actions: Vec<MenuAction>,
}

impl Popup {
    pub fn new(poi: impl Into<String>, at: Coordinates, mode: PlanMode) -> Self {
        Popup {
            poi: poi.into(),
            at,
            actions: MenuAction::for_mode(mode),
        }
    }

    pub fn offers(&self, action: MenuAction) -> bool {
        self.actions.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PoiCatalog {
        PoiCatalog::new(vec![
            Poi::new("Library", Coordinates { lat: 31.3160, lon: 121.3890 }).with_polygon(vec![
                Coordinates { lat: 31.3150, lon: 121.3880 },
                Coordinates { lat: 31.3170, lon: 121.3880 },
                Coordinates { lat: 31.3170, lon: 121.3900 },
                Coordinates { lat: 31.3150, lon: 121.3900 },
            ]),
            Poi::new("Gate", Coordinates { lat: 31.3200, lon: 121.3950 }),
        ])
    }

    #[test]
    fn polygon_pois_use_their_outline() {
        let layer = HitTestLayer::build(&catalog(), 20.0);
        let library = catalog().find("Library").unwrap().clone();

        assert_eq!(layer.areas()[0].shape, HitShape::Polygon(library.polygon));
    }

    #[test]
    fn point_pois_use_fixed_radius_disk() {
        let layer = HitTestLayer::build(&catalog(), 20.0);

        assert_eq!(
            layer.areas()[1].shape,
            HitShape::Disk {
                center: Coordinates { lat: 31.3200, lon: 121.3950 },
                radius_m: 20.0
            }
        );
    }

    #[test]
    fn hits_inside_polygon_and_disk() {
        let layer = HitTestLayer::build(&catalog(), 20.0);

        assert_eq!(layer.hit(&Coordinates { lat: 31.3160, lon: 121.3890 }), Some("Library"));
        // ~11 m north of the gate
        assert_eq!(layer.hit(&Coordinates { lat: 31.3201, lon: 121.3950 }), Some("Gate"));
        // ~110 m north of the gate
        assert_eq!(layer.hit(&Coordinates { lat: 31.3210, lon: 121.3950 }), None);
        assert_eq!(layer.hit(&Coordinates { lat: 31.3100, lon: 121.3890 }), None);
    }

    #[test]
    fn overlapping_areas_resolve_to_topmost() {
        let c = Coordinates { lat: 31.0, lon: 121.0 };
        let layer = HitTestLayer::build(
            &PoiCatalog::new(vec![Poi::new("Below", c), Poi::new("Above", c)]),
            20.0,
        );
        assert_eq!(layer.hit(&c), Some("Above"));
    }

    #[test]
    fn menu_depends_on_mode() {
        let at = Coordinates { lat: 31.0, lon: 121.0 };
        let standard = Popup::new("Gate", at, PlanMode::Standard);
        assert!(standard.offers(MenuAction::SetPoint(Slot::StandardEnd)));
        assert!(!standard.offers(MenuAction::AddStop));

        let tour = Popup::new("Gate", at, PlanMode::Tour);
        assert!(tour.offers(MenuAction::SetPoint(Slot::TourStart)));
        assert!(tour.offers(MenuAction::AddStop));
        assert!(!tour.offers(MenuAction::SetPoint(Slot::StandardStart)));
    }

    #[test]
    fn menu_action_labels() {
        assert_eq!(MenuAction::SetPoint(Slot::TourStart).label(), "Set as start");
        assert_eq!(MenuAction::SetPoint(Slot::StandardEnd).label(), "Set as end");
        assert_eq!(MenuAction::AddStop.label(), "Add as stop");
    }
}
