//! Interactive planner core.
//!
//! [`AppContext`] owns every piece of client state. The host feeds it user
//! [`Intent`]s and asynchronous [`Completion`]s; each call returns the
//! [`Effect`]s the host must execute next. Nothing here performs I/O.

pub mod hit_test;
pub mod layers;
pub mod orchestrator;
pub mod panel;
pub mod selection;
pub mod time_resolver;
pub mod tour_list;

use crate::config::{Config, MapConfig};
use crate::constants::DEFAULT_DEPARTURE;
use crate::error::GeolocationError;
use crate::models::{Coordinates, PathOutcome, PlanMode, Poi, PoiCatalog, TourOutcome, TravelMode};
use hit_test::{HitTestLayer, MenuAction, Popup};
use layers::Scene;
use orchestrator::{PathRequest, RouteQueryOrchestrator, Ticket, TourRequest};
use panel::{StandardPanel, TourPanel};
use selection::{SelectionState, Slot};
use std::collections::HashSet;
use time_resolver::{Clock, ClockTime, TimeMode, TimeResolver};
use tour_list::TourStopItem;

/// What to put into a single-POI slot
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    Clear,
    Poi(String),
    CurrentLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    MapClick(Coordinates),
    MenuAction(MenuAction),
    ClosePopup,
    Select { slot: Slot, choice: Choice },
    AddTourStop(String),
    RemoveTourStop(usize),
    SetMode(PlanMode),
    SetTravelMode(TravelMode),
    SetTourTravelMode(TravelMode),
    SetTimeMode(TimeMode),
    SetManualTime(String),
    PlanTour,
    ResetView,
    ClearAll,
}

#[derive(Debug)]
pub enum Completion {
    Located {
        slot: Slot,
        result: Result<Coordinates, GeolocationError>,
    },
    PathResolved {
        ticket: Ticket,
        result: crate::Result<PathOutcome>,
    },
    TourResolved {
        ticket: Ticket,
        result: crate::Result<TourOutcome>,
    },
}

/// Work the host performs on the context's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    QueryPath(PathRequest),
    QueryTour(TourRequest),
    /// Request a geolocation fix for the slot
    Locate(Slot),
    /// Blocking user notice
    Alert(String),
}

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub map: MapConfig,
    pub default_departure: ClockTime,
    pub geolocation_supported: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        AppOptions {
            map: MapConfig::default(),
            default_departure: DEFAULT_DEPARTURE.parse().unwrap_or(ClockTime::MIDNIGHT),
            geolocation_supported: true,
        }
    }
}

impl From<&Config> for AppOptions {
    fn from(config: &Config) -> Self {
        AppOptions {
            map: config.map.clone(),
            default_departure: config.default_departure,
            geolocation_supported: config.geolocation_supported(),
        }
    }
}

pub struct AppContext {
    catalog: PoiCatalog,
    hit_test: HitTestLayer,
    selection: SelectionState,
    scene: Scene,
    standard_panel: StandardPanel,
    tour_panel: TourPanel,
    travel_mode: TravelMode,
    tour_travel_mode: TravelMode,
    time: TimeResolver,
    orchestrator: RouteQueryOrchestrator,
    /// Slots with an outstanding geolocation request
    locating: HashSet<Slot>,
    options: AppOptions,
}

impl AppContext {
    /// Builds the hit-test layer from the catalogue before any input is
    /// accepted.
    pub fn new(catalog: PoiCatalog, options: AppOptions, clock: Box<dyn Clock>) -> Self {
        let hit_test = HitTestLayer::build(&catalog, options.map.hit_radius_m);
        let mut scene = Scene::new(options.map.center, options.map.zoom);
        scene.build_hit_test(&hit_test);

        tracing::info!(
            pois = catalog.len(),
            hit_radius_m = options.map.hit_radius_m,
            "Planner ready with {} POIs",
            catalog.len()
        );

        AppContext {
            catalog,
            hit_test,
            selection: SelectionState::new(),
            scene,
            standard_panel: StandardPanel::default(),
            tour_panel: TourPanel::default(),
            travel_mode: TravelMode::Walk,
            tour_travel_mode: TravelMode::Walk,
            time: TimeResolver::new(clock, options.default_departure),
            orchestrator: RouteQueryOrchestrator::new(),
            locating: HashSet::new(),
            options,
        }
    }

    pub fn catalog(&self) -> &PoiCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn mode(&self) -> PlanMode {
        self.selection.mode()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.scene.popup.as_ref()
    }

    pub fn standard_panel(&self) -> &StandardPanel {
        &self.standard_panel
    }

    pub fn tour_panel(&self) -> &TourPanel {
        &self.tour_panel
    }

    pub fn tour_stops(&self) -> Vec<TourStopItem> {
        tour_list::tour_stop_items(&self.selection)
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    pub fn tour_travel_mode(&self) -> TravelMode {
        self.tour_travel_mode
    }

    pub fn time_mode(&self) -> TimeMode {
        self.time.mode()
    }

    pub fn handle(&mut self, intent: Intent) -> Vec<Effect> {
        tracing::debug!(?intent, "Handling intent");

        match intent {
            Intent::MapClick(at) => {
                self.click(at);
                Vec::new()
            }
            Intent::MenuAction(action) => self.menu_action(action),
            Intent::ClosePopup => {
                self.scene.close_popup();
                Vec::new()
            }
            Intent::Select { slot, choice } => self.select(slot, choice),
            Intent::AddTourStop(name) => match self.catalog.find(&name).cloned() {
                Some(poi) => self.add_tour_stop(poi),
                None => {
                    tracing::warn!("Unknown tour stop '{}', ignoring", name);
                    Vec::new()
                }
            },
            Intent::RemoveTourStop(index) => {
                if self.selection.remove_tour_stop(index).is_none() {
                    return Vec::new();
                }
                self.selection_changed(false)
            }
            Intent::SetMode(mode) => self.set_mode(mode),
            Intent::SetTravelMode(mode) => self.set_travel_mode(mode),
            Intent::SetTourTravelMode(mode) => {
                self.tour_travel_mode = mode;
                Vec::new()
            }
            Intent::SetTimeMode(mode) => {
                self.time.set_mode(mode);
                self.requery_standard()
            }
            Intent::SetManualTime(text) => {
                self.time.set_manual_input(text);
                Vec::new()
            }
            Intent::PlanTour => self.plan_tour(),
            Intent::ResetView => {
                self.scene.set_view(self.options.map.center, self.options.map.zoom);
                Vec::new()
            }
            Intent::ClearAll => {
                self.clear_all();
                Vec::new()
            }
        }
    }

    pub fn complete(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::Located { slot, result } => self.located(slot, result),
            Completion::PathResolved { ticket, result } => {
                match result {
                    Ok(outcome) => {
                        self.orchestrator.finish_path_query(
                            ticket,
                            outcome,
                            self.travel_mode,
                            &mut self.scene,
                            &mut self.standard_panel,
                        );
                    }
                    Err(e) => self.orchestrator.fail_query(ticket, &e),
                }
                Vec::new()
            }
            Completion::TourResolved { ticket, result } => {
                match result {
                    Ok(outcome) => {
                        self.orchestrator.finish_tour_query(
                            ticket,
                            outcome,
                            &mut self.scene,
                            &mut self.tour_panel,
                        );
                    }
                    Err(e) => self.orchestrator.fail_query(ticket, &e),
                }
                Vec::new()
            }
        }
    }

    fn click(&mut self, at: Coordinates) {
        match self.hit_test.hit(&at) {
            Some(name) => {
                tracing::debug!(poi = name, "Opening menu for '{}'", name);
                let popup = Popup::new(name, at, self.selection.mode());
                self.scene.open_popup(popup);
            }
            None => {
                self.scene.close_popup();
            }
        }
    }

    fn menu_action(&mut self, action: MenuAction) -> Vec<Effect> {
        let Some(popup) = self.scene.close_popup() else {
            tracing::warn!(?action, "Menu action without an open menu");
            return Vec::new();
        };
        if !popup.offers(action) {
            tracing::warn!(?action, poi = %popup.poi, "Action not offered in this mode");
            return Vec::new();
        }
        let Some(poi) = self.catalog.find(&popup.poi).cloned() else {
            return Vec::new();
        };

        match action {
            MenuAction::SetPoint(slot) => self.set_point(slot, Some(poi)),
            MenuAction::AddStop => self.add_tour_stop(poi),
        }
    }

    fn select(&mut self, slot: Slot, choice: Choice) -> Vec<Effect> {
        match choice {
            Choice::Clear => self.set_point(slot, None),
            Choice::Poi(name) => {
                let poi = self.catalog.find(&name).cloned();
                if poi.is_none() {
                    tracing::warn!(slot = %slot, "Unknown POI '{}', clearing {}", name, slot);
                }
                self.set_point(slot, poi)
            }
            Choice::CurrentLocation => {
                if !self.options.geolocation_supported {
                    return vec![Effect::Alert(GeolocationError::Unsupported.to_string())];
                }
                if slot.mode() == PlanMode::Standard {
                    self.standard_panel = StandardPanel::Locating;
                }
                self.locating.insert(slot);
                tracing::debug!(slot = %slot, "Requesting geolocation fix");
                vec![Effect::Locate(slot)]
            }
        }
    }

    fn located(&mut self, slot: Slot, result: Result<Coordinates, GeolocationError>) -> Vec<Effect> {
        if !self.locating.remove(&slot) {
            tracing::debug!(slot = %slot, "Discarding geolocation result");
            return Vec::new();
        }

        match result {
            Ok(at) => {
                tracing::info!(slot = %slot, lat = at.lat, lon = at.lon, "Located");
                if self.standard_panel == StandardPanel::Locating {
                    self.standard_panel = StandardPanel::Prompt;
                }
                self.set_point(slot, Some(Poi::current_location(at)))
            }
            Err(e) => {
                tracing::warn!(slot = %slot, "Location failed: {}", e);
                match slot.mode() {
                    PlanMode::Standard => self.standard_panel = StandardPanel::LocateFailed,
                    PlanMode::Tour => self.tour_panel = TourPanel::LocateFailed,
                }
                vec![Effect::Alert(format!("Location failed: {}", e))]
            }
        }
    }

    /// Every endpoint change lands here. A fix still pending for the slot is
    /// superseded by it.
    fn set_point(&mut self, slot: Slot, poi: Option<Poi>) -> Vec<Effect> {
        if self.locating.remove(&slot) {
            tracing::debug!(slot = %slot, "Pending geolocation fix superseded");
            if slot.mode() == PlanMode::Standard && self.standard_panel == StandardPanel::Locating {
                self.standard_panel = StandardPanel::Prompt;
            }
        }
        self.selection.set_point(slot, poi);
        self.selection_changed(true)
    }

    fn add_tour_stop(&mut self, poi: Poi) -> Vec<Effect> {
        if !self.selection.add_tour_stop(poi) {
            return Vec::new();
        }
        self.selection_changed(false)
    }

    /// Redraws the selection layers; in standard mode a change to the
    /// endpoints re-queries or drops the stale route.
    fn selection_changed(&mut self, endpoints_changed: bool) -> Vec<Effect> {
        self.scene.redraw_selection(&self.selection);

        if !endpoints_changed || self.selection.mode() != PlanMode::Standard {
            return Vec::new();
        }
        if self.selection.standard().endpoints().is_some() {
            return self.query_path().into_iter().collect();
        }
        if self.orchestrator.has_standard_route() {
            self.orchestrator.forget_path();
            self.scene.clear_route();
            self.standard_panel = StandardPanel::Prompt;
        }
        Vec::new()
    }

    fn query_path(&mut self) -> Option<Effect> {
        let (start, end) = self.selection.standard().endpoints()?;
        let request = self.orchestrator.start_path_query(
            start,
            end,
            self.time.departure(),
            &mut self.scene,
            &mut self.standard_panel,
        );
        Some(Effect::QueryPath(request))
    }

    fn requery_standard(&mut self) -> Vec<Effect> {
        if self.selection.mode() != PlanMode::Standard {
            return Vec::new();
        }
        self.query_path().into_iter().collect()
    }

    fn set_mode(&mut self, mode: PlanMode) -> Vec<Effect> {
        if mode == self.selection.mode() {
            return Vec::new();
        }
        tracing::debug!(mode = %mode, "Switching to {} mode", mode);

        self.orchestrator.reset();
        self.scene.clear_route();
        self.scene.close_popup();
        self.standard_panel = StandardPanel::Prompt;
        self.tour_panel = TourPanel::Empty;
        self.selection.set_mode(mode);
        self.selection_changed(true)
    }

    fn set_travel_mode(&mut self, mode: TravelMode) -> Vec<Effect> {
        self.travel_mode = mode;
        if self.selection.mode() != PlanMode::Standard {
            return Vec::new();
        }
        let Some((start, end)) = self.selection.standard().endpoints() else {
            return Vec::new();
        };

        if self.orchestrator.rerender_path(
            start,
            end,
            mode,
            &mut self.scene,
            &mut self.standard_panel,
        ) {
            return Vec::new();
        }
        // An in-flight response will render with the new mode
        if self.orchestrator.is_pending(PlanMode::Standard) {
            return Vec::new();
        }
        self.query_path().into_iter().collect()
    }

    fn plan_tour(&mut self) -> Vec<Effect> {
        if self.selection.mode() != PlanMode::Tour {
            tracing::warn!("Tour planning requested outside tour mode");
            return Vec::new();
        }
        let tour = self.selection.tour();
        let Some(start) = tour.start.as_ref().filter(|_| tour.is_complete()) else {
            self.tour_panel = TourPanel::Incomplete;
            return Vec::new();
        };

        let request = self.orchestrator.start_tour_query(
            start,
            &tour.stops,
            self.tour_travel_mode,
            self.time.departure(),
            &mut self.scene,
            &mut self.tour_panel,
        );
        vec![Effect::QueryTour(request)]
    }

    fn clear_all(&mut self) {
        tracing::info!("Clearing all selections");
        self.selection.reset();
        self.orchestrator.reset();
        self.locating.clear();
        self.scene.reset(self.options.map.center, self.options.map.zoom);
        self.standard_panel = StandardPanel::Prompt;
        self.tour_panel = TourPanel::Empty;
        self.travel_mode = TravelMode::Walk;
        self.tour_travel_mode = TravelMode::Walk;
        self.time.reset();
    }
}
