#[cfg(feature = "cli")]
pub mod cli;
pub mod collab;
pub mod config;
pub mod costs;
pub mod error;
pub mod geodesy;
pub mod graph;
pub mod metrics;
pub mod model;
pub mod network;
pub mod prompt;
pub mod render;
pub mod report;
pub mod session;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, load_config};
pub use error::{CollabError, NetworkError};
pub use geodesy::{centroid, distance, pipeline_length};
pub use graph::{Component, ConnectivityGraph, build_graph, components};
pub use metrics::{Analysis, NetworkMetrics, aggregate, analyze};
pub use model::{Connection, Coordinate, Network, PipelineKind, PipelineRef, SelectedPoint};
pub use prompt::generate_prompt;
pub use session::{Session, SessionAction, SessionState};
pub use theme::Theme;
