use crate::error::NetworkError;
use crate::geodesy::{distance, pipeline_length};
use crate::graph::{Component, build_graph, components};
use crate::model::{Connection, Coordinate, Network, PipelineKind};
use serde::Serialize;

/// Aggregated lengths over the deployed-bearing part of the connection graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    /// Total length of deployed pipelines in deployed-bearing components.
    pub connected_deployed: f64,
    /// Total length of empty pipelines in deployed-bearing components.
    pub connected_empty: f64,
    /// Sum of every drawn connection's length, across all components.
    pub connection_distance: f64,
    /// Distinct coordinates of every pipeline in deployed-bearing components.
    pub connected_coordinates: Vec<Coordinate>,
}

/// Components together with the metrics derived from them.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub components: Vec<Component>,
    pub metrics: NetworkMetrics,
}

pub fn aggregate(
    components: &[Component],
    connections: &[Connection],
    network: &Network,
) -> Result<NetworkMetrics, NetworkError> {
    let mut metrics = NetworkMetrics::default();

    for component in components.iter().filter(|c| c.is_deployed_bearing()) {
        for &key in &component.members {
            let pipeline = network.pipeline(key)?;
            for coord in pipeline {
                if !metrics.connected_coordinates.contains(coord) {
                    metrics.connected_coordinates.push(*coord);
                }
            }
            let length = pipeline_length(pipeline);
            match key.kind {
                PipelineKind::Deployed => metrics.connected_deployed += length,
                PipelineKind::Empty => metrics.connected_empty += length,
            }
        }
    }

    metrics.connection_distance = connections
        .iter()
        .map(|conn| distance(conn.start, conn.end))
        .sum();

    Ok(metrics)
}

/// Builds the graph, finds its components and aggregates them in one pass.
pub fn analyze(network: &Network, connections: &[Connection]) -> Result<Analysis, NetworkError> {
    let graph = build_graph(connections);
    let components = components(&graph);
    let metrics = aggregate(&components, connections, network)?;
    Ok(Analysis {
        components,
        metrics,
    })
}
