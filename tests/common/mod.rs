use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campusroute::app::time_resolver::FixedClock;
use campusroute::app::{AppContext, AppOptions};
use campusroute::models::{Coordinates, PoiCatalog};
use campusroute::runtime::Presenter;
use geojson::FeatureCollection;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Latitude of the campus POI no route can reach
#[allow(dead_code)]
pub const CLOSED_LAB_LAT: f64 = 31.3100;

type Params = HashMap<String, String>;

/// Routing backend served over HTTP on an ephemeral port
#[allow(dead_code)]
pub struct StubBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<(String, Params)>>>,
}

#[allow(dead_code)]
impl StubBackend {
    /// Recorded `(endpoint, query)` pairs, in arrival order
    pub fn requests(&self) -> Vec<(String, Params)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<Params> {
        self.requests()
            .into_iter()
            .filter(|(e, _)| e == endpoint)
            .map(|(_, params)| params)
            .collect()
    }
}

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<(String, Params)>>>,
}

impl StubState {
    fn record(&self, endpoint: &str, params: &Params) {
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.to_string(), params.clone()));
    }
}

/// Start the stub routing backend
#[allow(dead_code)]
pub async fn spawn_stub_backend() -> StubBackend {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/api/locations", get(locations))
        .route("/api/find_path", get(find_path))
        .route("/api/find_tour", get(find_tour))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubBackend {
        base_url: format!("http://{}", addr),
        requests,
    }
}

fn locations_json() -> Value {
    json!([
        {
            "name": "Library",
            "lat": 31.3160,
            "lon": 121.3890,
            "polygon": [
                [31.3150, 121.3880],
                [31.3170, 121.3880],
                [31.3170, 121.3900],
                [31.3150, 121.3900]
            ]
        },
        {"name": "Gate", "lat": 31.3200, "lon": 121.3950},
        {"name": "Gym", "lat": 31.3120, "lon": 121.3920},
        {"name": "Canteen", "lat": 31.3140, "lon": 121.3860},
        {"name": "Closed Lab", "lat": CLOSED_LAB_LAT, "lon": 121.3800}
    ])
}

async fn locations(State(state): State<StubState>) -> Json<Value> {
    state.record("/api/locations", &Params::new());
    Json(locations_json())
}

fn coordinate(params: &Params, key: &str) -> Option<f64> {
    params.get(key)?.parse().ok()
}

async fn find_path(
    State(state): State<StubState>,
    Query(params): Query<Params>,
) -> (StatusCode, Json<Value>) {
    state.record("/api/find_path", &params);

    let (Some(start_lat), Some(start_lon), Some(end_lat), Some(end_lon)) = (
        coordinate(&params, "start_lat"),
        coordinate(&params, "start_lon"),
        coordinate(&params, "end_lat"),
        coordinate(&params, "end_lon"),
    ) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Params error"})));
    };

    if end_lat == CLOSED_LAB_LAT {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "No path found"})));
    }

    let mid = [(start_lat + end_lat) / 2.0, (start_lon + end_lon) / 2.0];
    (
        StatusCode::OK,
        Json(json!({
            "traffic_multiplier": 1.2,
            "recommendation": "bike",
            "walk": {
                "path": [[start_lat, start_lon], mid, [end_lat, end_lon]],
                "dist": 1000.0,
                "time": 750.0
            },
            "bike": {
                "path": [[start_lat, start_lon], [end_lat, end_lon]],
                "dist": 1100.0,
                "time": 300.0
            }
        })),
    )
}

async fn find_tour(
    State(state): State<StubState>,
    Query(params): Query<Params>,
) -> (StatusCode, Json<Value>) {
    state.record("/api/find_tour", &params);

    let (Some(start_lat), Some(start_lon), Some(stops), Some(names)) = (
        coordinate(&params, "start_lat"),
        coordinate(&params, "start_lon"),
        params.get("stops"),
        params.get("names"),
    ) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Params error"})));
    };

    let mut path = vec![json!([start_lat, start_lon])];
    for stop in stops.split('|').rev() {
        let Some((lat, lon)) = stop.split_once(',') else {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "Invalid stops"})));
        };
        let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "Invalid stops"})));
        };
        path.push(json!([lat, lon]));
    }

    // Stub solver: visit stops in reverse entry order
    let mut sequence = vec!["Start".to_string()];
    sequence.extend(names.split('|').rev().map(str::to_string));
    let legs = (sequence.len() - 1) as f64;
    let multiplier = if params.get("mode").map(String::as_str) == Some("bike") {
        1.4
    } else {
        1.0
    };

    (
        StatusCode::OK,
        Json(json!({
            "path": path,
            "sequence": sequence,
            "dist": 500.0 * legs,
            "time": 300.0 * legs,
            "traffic_multiplier": multiplier
        })),
    )
}

/// The stub's catalogue, as the client would load it
#[allow(dead_code)]
pub fn campus_catalog() -> PoiCatalog {
    let raw: Vec<campusroute::models::RawPoi> = serde_json::from_value(locations_json()).unwrap();
    PoiCatalog::new(raw.into_iter().filter_map(|p| p.into_poi()).collect())
}

/// Context over the campus catalogue with the clock fixed at `now`
#[allow(dead_code)]
pub fn campus_context(now: &str) -> AppContext {
    AppContext::new(
        campus_catalog(),
        AppOptions::default(),
        Box::new(FixedClock(now.parse().unwrap())),
    )
}

#[allow(dead_code)]
pub fn coords(lat: f64, lon: f64) -> Coordinates {
    Coordinates::new(lat, lon).unwrap()
}

/// Presenter that records what it was shown
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingPresenter {
    pub alerts: Vec<String>,
    pub presented: usize,
    pub layers: Vec<FeatureCollection>,
    pub poi_lists: Vec<Vec<String>>,
}

impl Presenter for RecordingPresenter {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn present(&mut self, _ctx: &AppContext) {
        self.presented += 1;
    }

    fn show_layers(&mut self, layers: &FeatureCollection) {
        self.layers.push(layers.clone());
    }

    fn show_pois(&mut self, catalog: &PoiCatalog) {
        self.poi_lists
            .push(catalog.all().iter().map(|p| p.name.clone()).collect());
    }
}
