use crate::app::time_resolver::ClockTime;
use crate::error::{AppError, Result};
use crate::models::{
    Coordinates, PathOutcome, Poi, RawPoi, RouteOutcome, TourOutcome, TravelMode,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Point-to-point query; the service answers for both travel modes at once.
#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    pub start: Coordinates,
    pub end: Coordinates,
    pub departure: ClockTime,
}

impl PathQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_lat", self.start.lat.to_string()),
            ("start_lon", self.start.lon.to_string()),
            ("end_lat", self.end.lat.to_string()),
            ("end_lon", self.end.lon.to_string()),
            ("time", self.departure.to_string()),
        ]
    }
}

/// Multi-stop query. `names` is order-parallel to `stops` so the solved
/// visiting order can be reported by name.
#[derive(Debug, Clone, PartialEq)]
pub struct TourQuery {
    pub start: Coordinates,
    pub stops: Vec<Coordinates>,
    pub names: Vec<String>,
    pub travel_mode: TravelMode,
    pub departure: ClockTime,
}

impl TourQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let stops = self
            .stops
            .iter()
            .map(|c| c.to_query_pair())
            .collect::<Vec<_>>()
            .join("|");
        vec![
            ("start_lat", self.start.lat.to_string()),
            ("start_lon", self.start.lon.to_string()),
            ("stops", stops),
            ("names", self.names.join("|")),
            ("mode", self.travel_mode.to_string()),
            ("time", self.departure.to_string()),
        ]
    }
}

#[async_trait]
pub trait RoutingBackend: Send + Sync {
    /// The POI catalogue, loaded once at startup
    async fn fetch_locations(&self) -> Result<Vec<Poi>>;

    async fn find_path(&self, query: &PathQuery) -> Result<PathOutcome>;

    async fn find_tour(&self, query: &TourQuery) -> Result<TourOutcome>;
}

#[derive(Clone)]
pub struct HttpRoutingClient {
    client: Client,
    base_url: String,
}

impl HttpRoutingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpRoutingClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET an endpoint and decode the JSON body whatever the status; the
    /// service reports refusals as `{"error": ...}` with 4xx/5xx codes.
    async fn get_json(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<(StatusCode, Value)> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::RoutingService(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            AppError::RoutingService(format!(
                "Failed to parse response (HTTP {}): {}",
                status, e
            ))
        })?;

        Ok((status, body))
    }
}

fn error_field(body: &Value) -> Option<String> {
    body.get("error").map(|e| match e.as_str() {
        Some(s) => s.to_string(),
        None => e.to_string(),
    })
}

fn into_outcome<T: DeserializeOwned>(status: StatusCode, body: Value) -> Result<RouteOutcome<T>> {
    if let Some(reason) = error_field(&body) {
        return Ok(RouteOutcome::Unreachable(reason));
    }
    if !status.is_success() {
        return Err(AppError::RoutingService(format!("HTTP {}: {}", status, body)));
    }
    serde_json::from_value(body)
        .map(RouteOutcome::Found)
        .map_err(|e| AppError::RoutingService(format!("Unexpected response shape: {}", e)))
}

#[async_trait]
impl RoutingBackend for HttpRoutingClient {
    async fn fetch_locations(&self) -> Result<Vec<Poi>> {
        let (status, body) = self.get_json("/api/locations", &[]).await?;

        if let Some(reason) = error_field(&body) {
            return Err(AppError::RoutingService(format!(
                "Location list unavailable (HTTP {}): {}",
                status, reason
            )));
        }

        let raw: Vec<RawPoi> = serde_json::from_value(body).map_err(|e| {
            AppError::RoutingService(format!("Unexpected location list shape: {}", e))
        })?;
        let pois: Vec<Poi> = raw.into_iter().filter_map(RawPoi::into_poi).collect();

        tracing::info!(count = pois.len(), "Loaded {} POIs", pois.len());
        Ok(pois)
    }

    async fn find_path(&self, query: &PathQuery) -> Result<PathOutcome> {
        tracing::debug!(
            start = ?query.start,
            end = ?query.end,
            time = %query.departure,
            "Path request departing {}",
            query.departure
        );
        let (status, body) = self.get_json("/api/find_path", &query.params()).await?;
        into_outcome(status, body)
    }

    async fn find_tour(&self, query: &TourQuery) -> Result<TourOutcome> {
        tracing::debug!(
            stops = query.stops.len(),
            mode = %query.travel_mode,
            time = %query.departure,
            "Tour request: {} stops, mode={}",
            query.stops.len(),
            query.travel_mode
        );
        let (status, body) = self.get_json("/api/find_tour", &query.params()).await?;
        into_outcome(status, body)
    }
}
