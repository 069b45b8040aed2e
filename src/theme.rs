use crate::model::PipelineKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: String,
    pub opacity: f32,
    pub weight: f32,
}

impl StrokeStyle {
    fn new(color: &str, opacity: f32, weight: f32) -> Self {
        Self {
            color: color.to_string(),
            opacity,
            weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub background: String,
    pub deployed: StrokeStyle,
    pub empty: StrokeStyle,
    pub connection: StrokeStyle,
    pub deployed_marker: String,
    pub empty_marker: String,
    pub selected_marker: String,
    pub marker_radius: f32,
}

impl Theme {
    /// Colors of the original dashboard map.
    pub fn dashboard() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
            deployed: StrokeStyle::new("#00FF00", 1.0, 4.0),
            empty: StrokeStyle::new("#FF0000", 1.0, 4.0),
            connection: StrokeStyle::new("#0000FF", 0.8, 3.0),
            deployed_marker: "#00FF00".to_string(),
            empty_marker: "#FF0000".to_string(),
            selected_marker: "#FFFF00".to_string(),
            marker_radius: 5.0,
        }
    }

    /// Muted palette for printed reports.
    pub fn print() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 12.0,
            text_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
            deployed: StrokeStyle::new("#2E7D32", 1.0, 3.0),
            empty: StrokeStyle::new("#C62828", 1.0, 3.0),
            connection: StrokeStyle::new("#1565C0", 0.9, 2.0),
            deployed_marker: "#2E7D32".to_string(),
            empty_marker: "#C62828".to_string(),
            selected_marker: "#F9A825".to_string(),
            marker_radius: 3.5,
        }
    }

    pub fn pipeline_style(&self, kind: PipelineKind) -> &StrokeStyle {
        match kind {
            PipelineKind::Deployed => &self.deployed,
            PipelineKind::Empty => &self.empty,
        }
    }

    pub fn marker_color(&self, kind: PipelineKind) -> &str {
        match kind {
            PipelineKind::Deployed => &self.deployed_marker,
            PipelineKind::Empty => &self.empty_marker,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dashboard()
    }
}
