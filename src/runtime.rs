//! Event loop that owns the [`AppContext`] and executes its effects.
//!
//! Commands arrive on one channel. Every asynchronous effect runs as its own
//! task and posts a [`Completion`] back on a second channel, so user input
//! is never blocked by a geolocation fix or an HTTP round-trip.

use crate::app::{AppContext, Completion, Effect, Intent};
use crate::models::PoiCatalog;
use crate::services::{Geolocator, RoutingBackend};
use geojson::FeatureCollection;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Dispatch(Intent),
    /// Choose the n-th (1-based) entry of the open popup menu
    PickMenu(usize),
    DumpLayers,
    ListPois,
    /// Stop accepting input; in-flight requests are awaited first
    Quit,
}

/// Receives everything the user should see
pub trait Presenter: Send {
    fn alert(&mut self, message: &str);

    /// Called after every processed command or completion
    fn present(&mut self, ctx: &AppContext);

    fn show_layers(&mut self, layers: &FeatureCollection);

    fn show_pois(&mut self, catalog: &PoiCatalog);
}

pub struct Session {
    ctx: AppContext,
    executor: Executor,
    inbox: mpsc::UnboundedReceiver<Completion>,
}

struct Executor {
    backend: Arc<dyn RoutingBackend>,
    geolocator: Arc<dyn Geolocator>,
    completions: mpsc::UnboundedSender<Completion>,
    in_flight: usize,
}

impl Session {
    pub fn new(
        ctx: AppContext,
        backend: Arc<dyn RoutingBackend>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        let (completions, inbox) = mpsc::unbounded_channel();
        Session {
            ctx,
            executor: Executor {
                backend,
                geolocator,
                completions,
                in_flight: 0,
            },
            inbox,
        }
    }

    /// Runs until `Quit` or until the command channel closes, then waits for
    /// outstanding effects so their results are applied and presented.
    pub async fn run<P: Presenter>(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut presenter: P,
    ) -> (AppContext, P) {
        presenter.present(&self.ctx);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let command = match command {
                        Some(SessionCommand::Quit) | None => break,
                        Some(command) => command,
                    };
                    self.command(command, &mut presenter);
                }
                Some(completion) = self.inbox.recv() => {
                    self.completion(completion, &mut presenter);
                }
            }
        }

        tracing::debug!(in_flight = self.executor.in_flight, "Draining outstanding effects");
        while self.executor.in_flight > 0 {
            match self.inbox.recv().await {
                Some(completion) => self.completion(completion, &mut presenter),
                None => break,
            }
        }

        (self.ctx, presenter)
    }

    fn command<P: Presenter>(&mut self, command: SessionCommand, presenter: &mut P) {
        match command {
            SessionCommand::Dispatch(intent) => self.dispatch(intent, presenter),
            SessionCommand::PickMenu(number) => {
                let action = self
                    .ctx
                    .popup()
                    .and_then(|popup| popup.actions.get(number.checked_sub(1)?))
                    .copied();
                match action {
                    Some(action) => self.dispatch(Intent::MenuAction(action), presenter),
                    None => presenter.alert("No such menu entry"),
                }
            }
            SessionCommand::DumpLayers => {
                presenter.show_layers(&self.ctx.scene().to_feature_collection())
            }
            SessionCommand::ListPois => presenter.show_pois(self.ctx.catalog()),
            SessionCommand::Quit => {}
        }
    }

    fn dispatch<P: Presenter>(&mut self, intent: Intent, presenter: &mut P) {
        let effects = self.ctx.handle(intent);
        self.executor.execute(effects, presenter);
        presenter.present(&self.ctx);
    }

    fn completion<P: Presenter>(&mut self, completion: Completion, presenter: &mut P) {
        self.executor.in_flight = self.executor.in_flight.saturating_sub(1);
        let effects = self.ctx.complete(completion);
        self.executor.execute(effects, presenter);
        presenter.present(&self.ctx);
    }
}

impl Executor {
    fn execute<P: Presenter>(&mut self, effects: Vec<Effect>, presenter: &mut P) {
        for effect in effects {
            match effect {
                Effect::Alert(message) => presenter.alert(&message),
                Effect::QueryPath(request) => {
                    let backend = Arc::clone(&self.backend);
                    self.spawn(async move {
                        let result = backend.find_path(&request.query).await;
                        Completion::PathResolved {
                            ticket: request.ticket,
                            result,
                        }
                    });
                }
                Effect::QueryTour(request) => {
                    let backend = Arc::clone(&self.backend);
                    self.spawn(async move {
                        let result = backend.find_tour(&request.query).await;
                        Completion::TourResolved {
                            ticket: request.ticket,
                            result,
                        }
                    });
                }
                Effect::Locate(slot) => {
                    let geolocator = Arc::clone(&self.geolocator);
                    self.spawn(async move {
                        let result = geolocator.locate().await;
                        Completion::Located { slot, result }
                    });
                }
            }
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let completion = task.await;
            if completions.send(completion).is_err() {
                tracing::debug!("Session closed before completion was delivered");
            }
        });
    }
}
