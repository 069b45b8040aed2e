use crate::collab::{ClickEvent, MapEvent};
use crate::error::NetworkError;
use crate::metrics::{Analysis, analyze};
use crate::model::{Connection, Coordinate, Network, PipelineKind, SelectedPoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    PointSelected,
}

/// Per-session connection store driven by map clicks.
///
/// Clicking a pipeline point while idle selects it; clicking a second point
/// draws a connection from the held point and returns to idle. Clicking bare
/// map space drops any held point.
#[derive(Debug, Clone, Default)]
pub struct Session {
    connections: Vec<Connection>,
    selected: Option<SelectedPoint>,
}

/// One recorded gesture, as stored in a session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SessionAction {
    #[serde(rename_all = "camelCase")]
    PointClick {
        coord: Coordinate,
        #[serde(rename = "type", alias = "kind")]
        kind: PipelineKind,
        pipeline_index: usize,
    },
    MapClick {
        #[serde(default)]
        coord: Option<Coordinate>,
    },
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connections(connections: Vec<Connection>) -> Self {
        Self {
            connections,
            selected: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.selected.is_some() {
            SessionState::PointSelected
        } else {
            SessionState::Idle
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn selected(&self) -> Option<&SelectedPoint> {
        self.selected.as_ref()
    }

    /// Handles a click on a pipeline marker. Returns the connection drawn by
    /// this click, if any.
    pub fn click_pipeline_point(
        &mut self,
        event: &mut dyn MapEvent,
        coord: Coordinate,
        kind: PipelineKind,
        pipeline_index: usize,
    ) -> Option<Connection> {
        event.stop_propagation();
        let clicked = SelectedPoint {
            coord,
            kind,
            pipeline_index,
        };
        match self.selected.take() {
            None => {
                log::info!("selected {} at {:.6}, {:.6}", clicked.pipeline(), coord.lat, coord.lng);
                self.selected = Some(clicked);
                None
            }
            Some(held) => {
                let connection = Connection {
                    start: held.coord,
                    end: clicked.coord,
                    start_pipeline: held.pipeline(),
                    end_pipeline: clicked.pipeline(),
                };
                log::info!(
                    "connected {} -> {} ({} connections)",
                    connection.start_pipeline,
                    connection.end_pipeline,
                    self.connections.len() + 1
                );
                self.connections.push(connection.clone());
                Some(connection)
            }
        }
    }

    /// Handles a click on bare map space. Any held point is discarded.
    ///
    /// Returns the clicked location so the caller can reverse-geocode and
    /// copy it, which happens whatever the prior state was. An event without
    /// a location is ignored.
    pub fn click_empty_area(&mut self, event: &dyn MapEvent) -> Option<Coordinate> {
        let coord = event.coordinates()?;
        if let Some(held) = self.selected.take() {
            log::info!("cleared pending selection on {}", held.pipeline());
        }
        Some(coord)
    }

    /// Applies recorded gestures in order, returning every map-click location.
    pub fn replay(&mut self, actions: &[SessionAction]) -> Vec<Coordinate> {
        let mut map_clicks = Vec::new();
        for action in actions {
            match action {
                SessionAction::PointClick {
                    coord,
                    kind,
                    pipeline_index,
                } => {
                    let mut event = ClickEvent::at(*coord);
                    self.click_pipeline_point(&mut event, *coord, *kind, *pipeline_index);
                }
                SessionAction::MapClick { coord } => {
                    let event = ClickEvent {
                        coord: *coord,
                        propagation_stopped: false,
                    };
                    if let Some(clicked) = self.click_empty_area(&event) {
                        map_clicks.push(clicked);
                    }
                }
            }
        }
        map_clicks
    }

    pub fn analyze(&self, network: &Network) -> Result<Analysis, NetworkError> {
        analyze(network, &self.connections)
    }
}
