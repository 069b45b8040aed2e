use crate::collab::{FixedGeocoder, GazetteerGeocoder, Geocoder, Place};
use crate::model::Coordinate;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: Coordinate::new(41.3851, 2.1734),
            zoom: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub background: String,
    pub show_summary: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 40.0,
            background: "#FFFFFF".to_string(),
            show_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Fixed address returned for every lookup; wins over `places`.
    pub address: Option<String>,
    pub places: Vec<Place>,
    pub max_distance_m: f64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            address: None,
            places: Vec::new(),
            max_distance_m: 25_000.0,
        }
    }
}

impl GeocoderConfig {
    pub fn build(&self) -> Box<dyn Geocoder> {
        match &self.address {
            Some(address) => Box::new(FixedGeocoder::new(address.clone())),
            None => Box::new(GazetteerGeocoder::new(
                self.places.clone(),
                self.max_distance_m,
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub map: MapConfig,
    pub theme: Theme,
    pub render: RenderConfig,
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StrokeFile {
    color: Option<String>,
    opacity: Option<f32>,
    weight: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    background: Option<String>,
    deployed: Option<StrokeFile>,
    empty: Option<StrokeFile>,
    connection: Option<StrokeFile>,
    deployed_marker: Option<String>,
    empty_marker: Option<String>,
    selected_marker: Option<String>,
    marker_radius: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct MapConfigFile {
    center: Option<Coordinate>,
    zoom: Option<u8>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
    show_summary: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeocoderConfigFile {
    address: Option<String>,
    places: Option<Vec<Place>>,
    max_distance_meters: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    map: Option<MapConfigFile>,
    render: Option<RenderConfigFile>,
    geocoder: Option<GeocoderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "dashboard" | "default" => config.theme = Theme::dashboard(),
            "print" => config.theme = Theme::print(),
            other => log::warn!("unknown theme '{other}', keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(stroke) = vars.deployed {
            merge_stroke(&mut config.theme.deployed, stroke);
        }
        if let Some(stroke) = vars.empty {
            merge_stroke(&mut config.theme.empty, stroke);
        }
        if let Some(stroke) = vars.connection {
            merge_stroke(&mut config.theme.connection, stroke);
        }
        if let Some(v) = vars.deployed_marker {
            config.theme.deployed_marker = v;
        }
        if let Some(v) = vars.empty_marker {
            config.theme.empty_marker = v;
        }
        if let Some(v) = vars.selected_marker {
            config.theme.selected_marker = v;
        }
        if let Some(v) = vars.marker_radius {
            config.theme.marker_radius = v;
        }
    }

    if let Some(map) = parsed.map {
        if let Some(v) = map.center {
            config.map.center = v;
        }
        if let Some(v) = map.zoom {
            config.map.zoom = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.show_summary {
            config.render.show_summary = v;
        }
    }

    if let Some(geocoder) = parsed.geocoder {
        if geocoder.address.is_some() {
            config.geocoder.address = geocoder.address;
        }
        if let Some(v) = geocoder.places {
            config.geocoder.places = v;
        }
        if let Some(v) = geocoder.max_distance_meters {
            config.geocoder.max_distance_m = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}

fn merge_stroke(style: &mut crate::theme::StrokeStyle, file: StrokeFile) {
    if let Some(v) = file.color {
        style.color = v;
    }
    if let Some(v) = file.opacity {
        style.opacity = v;
    }
    if let Some(v) = file.weight {
        style.weight = v;
    }
}
