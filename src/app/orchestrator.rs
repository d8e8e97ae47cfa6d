//! Builds route and tour queries from the selection and reconciles their
//! responses into the scene and result panels.
//!
//! Each issued query carries a [`Ticket`]. Only the outstanding ticket of a
//! mode may be applied; anything older is discarded, so a slow response can
//! never overwrite a newer one.

use crate::app::layers::Scene;
use crate::app::panel::{StandardPanel, StandardSummary, TourPanel, TourSummary};
use crate::app::time_resolver::ClockTime;
use crate::error::AppError;
use crate::models::{PathOutcome, PathResult, PlanMode, Poi, RouteOutcome, TourOutcome, TravelMode};
use crate::services::routing::{PathQuery, TourQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub mode: PlanMode,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathRequest {
    pub ticket: Ticket,
    pub query: PathQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TourRequest {
    pub ticket: Ticket,
    pub query: TourQuery,
}

#[derive(Debug, Clone)]
struct PendingPath {
    seq: u64,
    endpoints: (Poi, Poi),
    departure: ClockTime,
}

#[derive(Debug, Clone)]
struct PendingTour {
    seq: u64,
    travel_mode: TravelMode,
    departure: ClockTime,
}

/// The last standard response, kept so a walk/bike toggle can re-render it.
/// A refusal is kept too; it holds for either travel mode.
#[derive(Debug, Clone)]
struct ShownPath {
    endpoints: (Poi, Poi),
    departure: ClockTime,
    outcome: PathOutcome,
}

#[derive(Debug, Default)]
pub struct RouteQueryOrchestrator {
    next_seq: u64,
    pending_path: Option<PendingPath>,
    pending_tour: Option<PendingTour>,
    last_path: Option<ShownPath>,
}

impl RouteQueryOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ticket(&mut self, mode: PlanMode) -> Ticket {
        self.next_seq += 1;
        Ticket {
            mode,
            seq: self.next_seq,
        }
    }

    /// Whether a standard query or result exists that an endpoint change
    /// would invalidate
    pub fn has_standard_route(&self) -> bool {
        self.pending_path.is_some() || self.last_path.is_some()
    }

    pub fn is_pending(&self, mode: PlanMode) -> bool {
        match mode {
            PlanMode::Standard => self.pending_path.is_some(),
            PlanMode::Tour => self.pending_tour.is_some(),
        }
    }

    /// Clears the route layer, shows the computing placeholder and returns
    /// the request to issue.
    pub fn start_path_query(
        &mut self,
        start: &Poi,
        end: &Poi,
        departure: ClockTime,
        scene: &mut Scene,
        panel: &mut StandardPanel,
    ) -> PathRequest {
        scene.clear_route();
        *panel = StandardPanel::Computing;

        let ticket = self.next_ticket(PlanMode::Standard);
        self.pending_path = Some(PendingPath {
            seq: ticket.seq,
            endpoints: (start.clone(), end.clone()),
            departure,
        });
        self.last_path = None;

        tracing::info!(
            seq = ticket.seq,
            start = %start.name,
            end = %end.name,
            time = %departure,
            "Path query #{}: {} -> {} at {}",
            ticket.seq,
            start.name,
            end.name,
            departure
        );

        PathRequest {
            ticket,
            query: PathQuery {
                start: start.coordinates,
                end: end.coordinates,
                departure,
            },
        }
    }

    /// Applies a path response if its ticket is still outstanding.
    /// Returns whether it was applied.
    pub fn finish_path_query(
        &mut self,
        ticket: Ticket,
        outcome: PathOutcome,
        travel_mode: TravelMode,
        scene: &mut Scene,
        panel: &mut StandardPanel,
    ) -> bool {
        let Some(pending) = self.accept_path(ticket) else {
            return false;
        };

        if let RouteOutcome::Unreachable(reason) = &outcome {
            tracing::info!(seq = ticket.seq, "Path query #{} unreachable: {}", ticket.seq, reason);
        }
        let shown = ShownPath {
            endpoints: pending.endpoints,
            departure: pending.departure,
            outcome,
        };
        render_path(&shown, travel_mode, scene, panel);
        self.last_path = Some(shown);
        true
    }

    /// Transport failure: the request is settled but the placeholder stays.
    pub fn fail_query(&mut self, ticket: Ticket, error: &AppError) {
        let accepted = match ticket.mode {
            PlanMode::Standard => self.accept_path(ticket).is_some(),
            PlanMode::Tour => self.accept_tour(ticket).is_some(),
        };
        if accepted {
            tracing::error!(seq = ticket.seq, mode = %ticket.mode, "Query #{} failed: {}", ticket.seq, error);
        }
    }

    /// Re-renders the last standard result for `travel_mode` if it belongs to
    /// these endpoints. Returns `false` when a fresh query is needed.
    pub fn rerender_path(
        &self,
        start: &Poi,
        end: &Poi,
        travel_mode: TravelMode,
        scene: &mut Scene,
        panel: &mut StandardPanel,
    ) -> bool {
        match &self.last_path {
            Some(shown) if shown.endpoints.0 == *start && shown.endpoints.1 == *end => {
                tracing::debug!("Re-rendering cached path for {}", travel_mode);
                render_path(shown, travel_mode, scene, panel);
                true
            }
            _ => false,
        }
    }

    pub fn start_tour_query(
        &mut self,
        start: &Poi,
        stops: &[Poi],
        travel_mode: TravelMode,
        departure: ClockTime,
        scene: &mut Scene,
        panel: &mut TourPanel,
    ) -> TourRequest {
        scene.clear_route();
        *panel = TourPanel::Planning;

        let ticket = self.next_ticket(PlanMode::Tour);
        self.pending_tour = Some(PendingTour {
            seq: ticket.seq,
            travel_mode,
            departure,
        });

        tracing::info!(
            seq = ticket.seq,
            start = %start.name,
            stops = stops.len(),
            mode = %travel_mode,
            time = %departure,
            "Tour query #{}: from {} via {} stops ({}) at {}",
            ticket.seq,
            start.name,
            stops.len(),
            travel_mode,
            departure
        );

        TourRequest {
            ticket,
            query: TourQuery {
                start: start.coordinates,
                stops: stops.iter().map(|s| s.coordinates).collect(),
                names: stops.iter().map(|s| s.name.clone()).collect(),
                travel_mode,
                departure,
            },
        }
    }

    pub fn finish_tour_query(
        &mut self,
        ticket: Ticket,
        outcome: TourOutcome,
        scene: &mut Scene,
        panel: &mut TourPanel,
    ) -> bool {
        let Some(pending) = self.accept_tour(ticket) else {
            return false;
        };

        match outcome {
            RouteOutcome::Unreachable(reason) => {
                tracing::info!(seq = ticket.seq, "Tour query #{} unreachable: {}", ticket.seq, reason);
                *panel = TourPanel::Unreachable;
            }
            RouteOutcome::Found(result) => {
                scene.clear_markers();
                scene.show_route(result.to_coordinates(), pending.travel_mode);
                let summary = TourSummary::new(&result, pending.travel_mode, pending.departure);
                tracing::info!(
                    seq = ticket.seq,
                    visits = summary.sequence.len(),
                    "Tour #{} solved: {}",
                    ticket.seq,
                    summary.sequence.join(" -> ")
                );
                *panel = TourPanel::Result(summary);
            }
        }
        true
    }

    /// Drop the outstanding standard query and cached result
    pub fn forget_path(&mut self) {
        self.pending_path = None;
        self.last_path = None;
    }

    /// Drop outstanding queries of both modes; late responses are discarded
    pub fn cancel_pending(&mut self) {
        self.pending_path = None;
        self.pending_tour = None;
    }

    pub fn reset(&mut self) {
        self.cancel_pending();
        self.last_path = None;
    }

    fn accept_path(&mut self, ticket: Ticket) -> Option<PendingPath> {
        match &self.pending_path {
            Some(p) if ticket.mode == PlanMode::Standard && p.seq == ticket.seq => {
                self.pending_path.take()
            }
            _ => {
                tracing::debug!(seq = ticket.seq, "Discarding stale path response #{}", ticket.seq);
                None
            }
        }
    }

    fn accept_tour(&mut self, ticket: Ticket) -> Option<PendingTour> {
        match &self.pending_tour {
            Some(p) if ticket.mode == PlanMode::Tour && p.seq == ticket.seq => {
                self.pending_tour.take()
            }
            _ => {
                tracing::debug!(seq = ticket.seq, "Discarding stale tour response #{}", ticket.seq);
                None
            }
        }
    }
}

fn render_path(
    shown: &ShownPath,
    travel_mode: TravelMode,
    scene: &mut Scene,
    panel: &mut StandardPanel,
) {
    scene.clear_route();

    let result = match &shown.outcome {
        RouteOutcome::Found(result) => result,
        RouteOutcome::Unreachable(_) => {
            *panel = StandardPanel::Unreachable;
            return;
        }
    };
    let leg = result.leg(travel_mode);
    if !leg.is_reachable() {
        tracing::info!("No {} route between the endpoints", travel_mode);
        *panel = StandardPanel::Unreachable;
        return;
    }

    scene.clear_markers();
    scene.show_route(leg.to_coordinates(), travel_mode);
    *panel = StandardPanel::Result(StandardSummary::new(
        result,
        travel_mode,
        shown.departure,
    ));
}
