use crate::model::{Connection, PipelineRef};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// Undirected multigraph over pipeline identities.
///
/// `vertices` keeps first-appearance order across connections (start key
/// before end key) so component discovery is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityGraph {
    pub vertices: Vec<PipelineRef>,
    pub adjacency: HashMap<PipelineRef, Vec<PipelineRef>>,
}

impl ConnectivityGraph {
    pub fn neighbors(&self, key: &PipelineRef) -> &[PipelineRef] {
        self.adjacency.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &PipelineRef) -> bool {
        self.adjacency.contains_key(key)
    }

    fn add_vertex(&mut self, key: PipelineRef) {
        if !self.adjacency.contains_key(&key) {
            self.vertices.push(key);
            self.adjacency.insert(key, Vec::new());
        }
    }
}

/// Builds the connectivity graph from user-drawn connections. Parallel edges
/// and self-loops are stored as given.
pub fn build_graph(connections: &[Connection]) -> ConnectivityGraph {
    let mut graph = ConnectivityGraph::default();
    for conn in connections {
        let start = conn.start_pipeline;
        let end = conn.end_pipeline;
        graph.add_vertex(start);
        graph.add_vertex(end);
        graph.adjacency.entry(start).or_default().push(end);
        graph.adjacency.entry(end).or_default().push(start);
    }
    log::debug!(
        "built connectivity graph: {} vertices from {} connections",
        graph.vertices.len(),
        connections.len()
    );
    graph
}

/// A maximal set of pipelines reachable from one another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Distinct members in BFS discovery order.
    pub members: Vec<PipelineRef>,
}

impl Component {
    pub fn is_deployed_bearing(&self) -> bool {
        self.members.iter().any(PipelineRef::is_deployed)
    }

    pub fn contains(&self, key: &PipelineRef) -> bool {
        self.members.contains(key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partitions the graph into connected components with breadth-first search,
/// emitted in the order their root vertex was first seen.
pub fn components(graph: &ConnectivityGraph) -> Vec<Component> {
    let mut visited: HashSet<PipelineRef> = HashSet::new();
    let mut result = Vec::new();

    for &root in &graph.vertices {
        if visited.contains(&root) {
            continue;
        }
        let mut members = Vec::new();
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            members.push(current);
            for neighbor in graph.neighbors(&current) {
                if !visited.contains(neighbor) {
                    queue.push_back(*neighbor);
                }
            }
        }
        result.push(Component { members });
    }

    log::debug!(
        "found {} components ({} deployed-bearing)",
        result.len(),
        result.iter().filter(|c| c.is_deployed_bearing()).count()
    );
    result
}
