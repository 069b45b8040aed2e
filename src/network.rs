use crate::collab::{Notification, Notifier};
use crate::error::NetworkError;
use crate::model::{Connection, Network, PipelineRef};
use crate::session::SessionAction;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A network file: pipeline geometry plus an optional recorded session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFile {
    #[serde(flatten)]
    pub network: Network,
    /// Connections drawn in an earlier session.
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Gestures replayed on top of `connections`.
    #[serde(default)]
    pub actions: Vec<SessionAction>,
}

pub fn parse_network(input: &str) -> Result<NetworkFile, NetworkError> {
    let file: NetworkFile = serde_json::from_str(input)?;
    log::info!(
        "loaded {} deployed and {} empty pipelines, {} connections, {} actions",
        file.network.deployed.len(),
        file.network.empty.len(),
        file.connections.len(),
        file.actions.len()
    );
    Ok(file)
}

pub fn load_network(path: &Path) -> Result<NetworkFile, NetworkError> {
    let contents = std::fs::read_to_string(path)?;
    parse_network(&contents)
}

/// Loads only the pipeline geometry, ignoring any recorded session.
pub fn load_pipelines(path: &Path) -> Result<Network, NetworkError> {
    let contents = std::fs::read_to_string(path)?;
    let network: Network = serde_json::from_str(&contents)?;
    log::info!(
        "loaded {} deployed and {} empty pipelines from {}",
        network.deployed.len(),
        network.empty.len(),
        path.display()
    );
    Ok(network)
}

/// Loads a network, substituting an empty one when it cannot be read.
pub fn load_network_or_default(path: &Path, notifier: &mut dyn Notifier) -> NetworkFile {
    match load_network(path) {
        Ok(file) => file,
        Err(err) => {
            log::warn!("pipeline data unavailable from {}: {err}", path.display());
            notifier.notify(Notification::error("Error", "Failed to load pipeline data"));
            NetworkFile::default()
        }
    }
}

/// Checks that every connection points at an existing pipeline.
pub fn validate_connections(network: &Network, connections: &[Connection]) -> Result<(), NetworkError> {
    let check = |pipeline: PipelineRef| network.pipeline(pipeline).map(|_| ());
    for conn in connections {
        check(conn.start_pipeline)?;
        check(conn.end_pipeline)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    const SAMPLE: &str = r#"{
        "deployed": [
            [{"latitude": 51.505, "longitude": -0.09}, {"latitude": 51.5052, "longitude": -0.089}]
        ],
        "empty": [
            [{"lat": 51.5056, "lng": -0.087}, {"lat": 51.5058, "lng": -0.086}]
        ],
        "connections": [
            {
                "start": {"lat": 51.5052, "lng": -0.089},
                "end": {"lat": 51.5056, "lng": -0.087},
                "startPipeline": {"type": "deployed", "index": 0},
                "endPipeline": {"type": "empty", "index": 0}
            }
        ]
    }"#;

    #[test]
    fn parses_both_node_shapes() {
        let file = parse_network(SAMPLE).unwrap();
        assert_eq!(file.network.deployed[0][0], Coordinate::new(51.505, -0.09));
        assert_eq!(file.network.empty[0][1], Coordinate::new(51.5058, -0.086));
        assert_eq!(file.connections[0].end_pipeline, PipelineRef::empty(0));
        assert!(file.actions.is_empty());
        validate_connections(&file.network, &file.connections).unwrap();
    }

    #[test]
    fn missing_file_falls_back_to_empty_network() {
        let mut notes: Vec<Notification> = Vec::new();
        let file = load_network_or_default(Path::new("/nonexistent/pipelines.json"), &mut notes);
        assert!(file.network.is_empty());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].description, "Failed to load pipeline data");
    }

    #[test]
    fn pipeline_only_load_reports_missing_file() {
        assert!(matches!(
            load_pipelines(Path::new("/nonexistent/pipelines.json")),
            Err(NetworkError::Io(_))
        ));
    }

    #[test]
    fn validation_rejects_dangling_connection() {
        let mut file = parse_network(SAMPLE).unwrap();
        file.connections[0].end_pipeline = PipelineRef::empty(4);
        assert!(matches!(
            validate_connections(&file.network, &file.connections),
            Err(NetworkError::UnknownPipeline { .. })
        ));
    }
}
