use crate::error::NetworkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A latitude/longitude pair in degrees.
///
/// Equality is exact field equality. Coordinates are always copied verbatim
/// from pipeline geometry, so no tolerance is applied when deduplicating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Deployed,
    Empty,
}

impl PipelineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deployed => "deployed",
            Self::Empty => "empty",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "deployed" => Some(Self::Deployed),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one pipeline: its kind plus its index in that kind's
/// collection. Used as the vertex key of the connectivity graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PipelineRef {
    #[serde(rename = "type", alias = "kind")]
    pub kind: PipelineKind,
    pub index: usize,
}

impl PipelineRef {
    pub const fn new(kind: PipelineKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub const fn deployed(index: usize) -> Self {
        Self::new(PipelineKind::Deployed, index)
    }

    pub const fn empty(index: usize) -> Self {
        Self::new(PipelineKind::Empty, index)
    }

    pub fn is_deployed(&self) -> bool {
        self.kind == PipelineKind::Deployed
    }
}

/// Renders the `<kind>-<index>` node key, e.g. `deployed-0`.
impl fmt::Display for PipelineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.index)
    }
}

impl FromStr for PipelineRef {
    type Err = NetworkError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (kind, index) = key
            .split_once('-')
            .ok_or_else(|| NetworkError::InvalidKey(key.to_string()))?;
        let kind =
            PipelineKind::from_token(kind).ok_or_else(|| NetworkError::InvalidKey(key.to_string()))?;
        let index = index
            .parse::<usize>()
            .map_err(|_| NetworkError::InvalidKey(key.to_string()))?;
        Ok(Self { kind, index })
    }
}

/// A user-drawn link between a point on one pipeline and a point on another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub start: Coordinate,
    pub end: Coordinate,
    pub start_pipeline: PipelineRef,
    pub end_pipeline: PipelineRef,
}

/// The pending first endpoint of a connection being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPoint {
    pub coord: Coordinate,
    #[serde(rename = "type", alias = "kind")]
    pub kind: PipelineKind,
    pub pipeline_index: usize,
}

impl SelectedPoint {
    pub fn pipeline(&self) -> PipelineRef {
        PipelineRef::new(self.kind, self.pipeline_index)
    }
}

pub type Pipeline = Vec<Coordinate>;

/// Both pipeline collections supplied by the data provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub deployed: Vec<Pipeline>,
    #[serde(default)]
    pub empty: Vec<Pipeline>,
}

impl Network {
    pub fn new(deployed: Vec<Pipeline>, empty: Vec<Pipeline>) -> Self {
        Self { deployed, empty }
    }

    pub fn pipelines(&self, kind: PipelineKind) -> &[Pipeline] {
        match kind {
            PipelineKind::Deployed => &self.deployed,
            PipelineKind::Empty => &self.empty,
        }
    }

    /// Looks up a pipeline, failing fast when the index is out of bounds.
    pub fn pipeline(&self, pipeline: PipelineRef) -> Result<&[Coordinate], NetworkError> {
        let collection = self.pipelines(pipeline.kind);
        collection
            .get(pipeline.index)
            .map(Vec::as_slice)
            .ok_or(NetworkError::UnknownPipeline {
                pipeline,
                kind: pipeline.kind.as_str(),
                available: collection.len(),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.deployed.is_empty() && self.empty.is_empty()
    }

    /// Iterates every point of every pipeline with its owner.
    pub fn points(&self) -> impl Iterator<Item = (PipelineRef, Coordinate)> + '_ {
        let deployed = self.deployed.iter().enumerate().flat_map(|(idx, pipeline)| {
            pipeline
                .iter()
                .map(move |coord| (PipelineRef::deployed(idx), *coord))
        });
        let empty = self.empty.iter().enumerate().flat_map(|(idx, pipeline)| {
            pipeline
                .iter()
                .map(move |coord| (PipelineRef::empty(idx), *coord))
        });
        deployed.chain(empty)
    }
}
