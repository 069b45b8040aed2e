use crate::graph::Component;
use crate::metrics::Analysis;
use crate::model::{Connection, Coordinate};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub connected_deployed: f64,
    pub connected_empty: f64,
    pub connection_distance: f64,
    pub centroid: Option<Coordinate>,
    pub address: String,
    pub prompt: String,
    pub components: Vec<ComponentDump>,
    pub connections: Vec<ConnectionDump>,
    pub connected_coordinates: Vec<Coordinate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDump {
    pub index: usize,
    pub members: Vec<String>,
    pub deployed_bearing: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDump {
    pub from: String,
    pub to: String,
    pub start: Coordinate,
    pub end: Coordinate,
    pub length: f64,
}

impl ComponentDump {
    fn from_component(index: usize, component: &Component) -> Self {
        Self {
            index,
            members: component.members.iter().map(ToString::to_string).collect(),
            deployed_bearing: component.is_deployed_bearing(),
        }
    }
}

impl Report {
    pub fn new(analysis: &Analysis, connections: &[Connection], address: &str, prompt: &str) -> Self {
        let metrics = &analysis.metrics;
        let components = analysis
            .components
            .iter()
            .enumerate()
            .map(|(idx, component)| ComponentDump::from_component(idx, component))
            .collect();
        let connections = connections
            .iter()
            .map(|conn| ConnectionDump {
                from: conn.start_pipeline.to_string(),
                to: conn.end_pipeline.to_string(),
                start: conn.start,
                end: conn.end,
                length: crate::geodesy::distance(conn.start, conn.end),
            })
            .collect();

        Report {
            connected_deployed: metrics.connected_deployed,
            connected_empty: metrics.connected_empty,
            connection_distance: metrics.connection_distance,
            centroid: crate::geodesy::centroid(&metrics.connected_coordinates),
            address: address.to_string(),
            prompt: prompt.to_string(),
            components,
            connections,
            connected_coordinates: metrics.connected_coordinates.clone(),
        }
    }
}

pub fn write_report(path: Option<&Path>, report: &Report) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, report)?;
        }
        None => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}
