//! Retained map scene: four overlay layers, the viewport and the open popup.
//!
//! The scene is derived data. Highlight and marker layers are rebuilt in full
//! from the selection on every change; the route layer is written only by the
//! query orchestrator. A host renderer reads the scene, or exports it as
//! GeoJSON.

use crate::app::hit_test::{HitShape, HitTestLayer, Popup};
use crate::app::selection::SelectionState;
use crate::constants::*;
use crate::models::{Bounds, Coordinates, PlanMode, Poi, TravelMode};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Transparent,
    Green,
    Red,
    Orange,
    Blue,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Transparent => "transparent",
            Color::Green => "green",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Blue => "blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a selected point plays, which decides its highlight colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Start,
    End,
    Stop,
}

impl Role {
    pub fn color(&self) -> Color {
        match self {
            Role::Start => Color::Green,
            Role::End => Color::Red,
            Role::Stop => Color::Orange,
        }
    }
}

pub fn route_color(mode: TravelMode) -> Color {
    match mode {
        TravelMode::Walk => Color::Blue,
        TravelMode::Bike => Color::Red,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Vec<Coordinates>),
    /// Radius in world meters
    Circle { center: Coordinates, radius_m: f64 },
    /// Radius in screen pixels
    CircleMarker { center: Coordinates, radius_px: f64 },
    Pin { at: Coordinates, label: String },
    Polyline(Vec<Coordinates>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub shape: Shape,
    pub color: Color,
    pub fill_opacity: f64,
    pub weight: Option<f64>,
}

impl Overlay {
    fn new(shape: Shape, color: Color, fill_opacity: f64) -> Self {
        Overlay {
            shape,
            color,
            fill_opacity,
            weight: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    HitTest,
    Highlight,
    Markers,
    Route,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::HitTest => "hit_test",
            LayerKind::Highlight => "highlight",
            LayerKind::Markers => "markers",
            LayerKind::Route => "route",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Centered { center: Coordinates, zoom: u8 },
    Fitted(Bounds),
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub hit_test: Vec<Overlay>,
    pub highlight: Vec<Overlay>,
    pub markers: Vec<Overlay>,
    pub route: Vec<Overlay>,
    pub viewport: Viewport,
    pub popup: Option<Popup>,
}

impl Scene {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Scene {
            hit_test: Vec::new(),
            highlight: Vec::new(),
            markers: Vec::new(),
            route: Vec::new(),
            viewport: Viewport::Centered { center, zoom },
            popup: None,
        }
    }

    pub fn layer(&self, kind: LayerKind) -> &[Overlay] {
        match kind {
            LayerKind::HitTest => &self.hit_test,
            LayerKind::Highlight => &self.highlight,
            LayerKind::Markers => &self.markers,
            LayerKind::Route => &self.route,
        }
    }

    /// Transparent clickable outlines, one per POI, in registration order
    pub fn build_hit_test(&mut self, layer: &HitTestLayer) {
        self.hit_test = layer
            .areas()
            .iter()
            .map(|area| {
                let shape = match &area.shape {
                    HitShape::Polygon(ring) => Shape::Polygon(ring.clone()),
                    HitShape::Disk { center, radius_m } => Shape::Circle {
                        center: *center,
                        radius_m: *radius_m,
                    },
                };
                Overlay::new(shape, Color::Transparent, 0.0)
            })
            .collect();
    }

    /// Rebuild highlight and marker layers from the active mode's selection
    pub fn redraw_selection(&mut self, selection: &SelectionState) {
        self.highlight.clear();
        self.markers.clear();

        match selection.mode() {
            PlanMode::Standard => {
                let standard = selection.standard();
                if let Some(start) = &standard.start {
                    self.draw_selected(start, Role::Start);
                }
                if let Some(end) = &standard.end {
                    self.draw_selected(end, Role::End);
                }
            }
            PlanMode::Tour => {
                let tour = selection.tour();
                if let Some(start) = &tour.start {
                    self.draw_selected(start, Role::Start);
                }
                for stop in &tour.stops {
                    self.draw_selected(stop, Role::Stop);
                }
            }
        }
    }

    fn draw_selected(&mut self, poi: &Poi, role: Role) {
        let color = role.color();
        let highlight = if poi.has_polygon() {
            Overlay::new(
                Shape::Polygon(poi.polygon.clone()),
                color,
                HIGHLIGHT_POLYGON_FILL_OPACITY,
            )
        } else {
            Overlay::new(
                Shape::CircleMarker {
                    center: poi.coordinates,
                    radius_px: HIGHLIGHT_MARKER_RADIUS_PX,
                },
                color,
                HIGHLIGHT_MARKER_FILL_OPACITY,
            )
        };
        self.highlight.push(highlight);

        self.markers.push(Overlay::new(
            Shape::Pin {
                at: poi.coordinates,
                label: poi.name.clone(),
            },
            color,
            PIN_OPACITY,
        ));
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
    }

    pub fn clear_route(&mut self) {
        self.route.clear();
    }

    /// Draw a route polyline and fit the viewport to it. Empty paths draw
    /// nothing and leave the viewport as it is.
    pub fn show_route(&mut self, path: Vec<Coordinates>, mode: TravelMode) {
        let Some(bounds) = Bounds::of_path(&path) else {
            tracing::debug!("Route has no geometry, nothing to draw");
            return;
        };
        self.route.push(Overlay {
            shape: Shape::Polyline(path),
            color: route_color(mode),
            fill_opacity: 0.0,
            weight: Some(ROUTE_LINE_WEIGHT),
        });
        self.viewport = Viewport::Fitted(bounds.pad(ROUTE_FIT_PADDING));
    }

    pub fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.viewport = Viewport::Centered { center, zoom };
    }

    pub fn open_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
    }

    pub fn close_popup(&mut self) -> Option<Popup> {
        self.popup.take()
    }

    /// Everything except the hit-test layer, back to an empty map
    pub fn reset(&mut self, center: Coordinates, zoom: u8) {
        self.highlight.clear();
        self.markers.clear();
        self.route.clear();
        self.popup = None;
        self.set_view(center, zoom);
    }

    /// All layers as one GeoJSON collection, tagged with `layer`, `color`
    /// and size properties a renderer needs
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let layers = [
            LayerKind::HitTest,
            LayerKind::Highlight,
            LayerKind::Markers,
            LayerKind::Route,
        ];
        let features = layers
            .iter()
            .flat_map(|kind| {
                self.layer(*kind)
                    .iter()
                    .map(move |overlay| overlay_feature(*kind, overlay))
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn overlay_feature(kind: LayerKind, overlay: &Overlay) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("layer".to_string(), json!(kind.as_str()));
    properties.insert("color".to_string(), json!(overlay.color.as_str()));
    properties.insert("fill_opacity".to_string(), json!(overlay.fill_opacity));
    if let Some(weight) = overlay.weight {
        properties.insert("weight".to_string(), json!(weight));
    }

    let value = match &overlay.shape {
        Shape::Polygon(ring) => {
            let mut positions: Vec<Vec<f64>> = ring.iter().map(|c| c.to_position()).collect();
            // GeoJSON rings are explicitly closed
            if let (Some(first), Some(last)) = (positions.first(), positions.last()) {
                if first != last {
                    positions.push(first.clone());
                }
            }
            Value::Polygon(vec![positions])
        }
        Shape::Circle { center, radius_m } => {
            properties.insert("radius_m".to_string(), json!(radius_m));
            Value::Point(center.to_position())
        }
        Shape::CircleMarker { center, radius_px } => {
            properties.insert("radius_px".to_string(), json!(radius_px));
            Value::Point(center.to_position())
        }
        Shape::Pin { at, label } => {
            properties.insert("label".to_string(), json!(label));
            Value::Point(at.to_position())
        }
        Shape::Polyline(path) => Value::LineString(path.iter().map(|c| c.to_position()).collect()),
    };

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
