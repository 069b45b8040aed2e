use conduit_planner::config::MapConfig;
use conduit_planner::prompt::{GEOCODE_FALLBACK, UNKNOWN_LOCATION, format_summary};
use conduit_planner::{Connection, Network, Theme, analyze, centroid, generate_prompt};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(flatten)]
    network: Network,
    #[serde(default)]
    connections: Vec<Connection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    connected_deployed: f64,
    connected_empty: f64,
    connection_distance: f64,
    centroid: Option<conduit_planner::Coordinate>,
    summary: String,
    components: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct MapSettings {
    map: MapConfig,
    theme: Theme,
}

fn analyze_json(request_json: &str) -> Result<String, String> {
    let request: AnalyzeRequest =
        serde_json::from_str(request_json).map_err(|error| error.to_string())?;
    let analysis =
        analyze(&request.network, &request.connections).map_err(|error| error.to_string())?;
    let metrics = &analysis.metrics;
    let response = AnalyzeResponse {
        connected_deployed: metrics.connected_deployed,
        connected_empty: metrics.connected_empty,
        connection_distance: metrics.connection_distance,
        centroid: centroid(&metrics.connected_coordinates),
        summary: format_summary(metrics),
        components: analysis
            .components
            .iter()
            .map(|component| component.members.iter().map(ToString::to_string).collect())
            .collect(),
    };
    serde_json::to_string(&response).map_err(|error| error.to_string())
}

/// Aggregates a network and its drawn connections. The centroid in the
/// response is what the page should reverse-geocode for the prompt.
#[wasm_bindgen]
pub fn analyze_network(request_json: &str) -> Result<String, JsValue> {
    analyze_json(request_json).map_err(|error| JsValue::from_str(&error))
}

/// Renders the feasibility prompt. `address` is `None` when nothing is
/// connected yet; set `geocode_failed` when the centroid lookup failed.
#[wasm_bindgen]
pub fn feasibility_prompt(
    address: Option<String>,
    geocode_failed: bool,
    connected_deployed: f64,
    connected_empty: f64,
    connection_distance: f64,
) -> String {
    let address = match (address.as_deref(), geocode_failed) {
        (_, true) => GEOCODE_FALLBACK,
        (None, false) => UNKNOWN_LOCATION,
        (Some(address), false) => address,
    };
    generate_prompt(address, connected_deployed, connected_empty, connection_distance)
}

fn map_settings_json() -> Result<String, String> {
    let settings = MapSettings {
        map: MapConfig::default(),
        theme: Theme::dashboard(),
    };
    serde_json::to_string(&settings).map_err(|error| error.to_string())
}

/// Initial map view and line colors for the dashboard.
#[wasm_bindgen]
pub fn map_settings() -> Result<String, JsValue> {
    map_settings_json().map_err(|error| JsValue::from_str(&error))
}
