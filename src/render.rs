use crate::config::RenderConfig;
use crate::geodesy::bounds;
use crate::metrics::NetworkMetrics;
use crate::model::{Connection, Coordinate, Network, PipelineKind, SelectedPoint};
use crate::prompt::format_summary;
use crate::theme::{StrokeStyle, Theme};
use anyhow::Result;
use std::path::Path;

/// Everything drawn on the overview map.
#[derive(Debug, Clone, Copy)]
pub struct MapView<'a> {
    pub network: &'a Network,
    pub connections: &'a [Connection],
    pub selected: Option<&'a SelectedPoint>,
}

/// Equirectangular projection of a lat/lng box into the drawable area.
struct Projection {
    min: Coordinate,
    scale: f64,
    lng_factor: f64,
    offset_x: f64,
    offset_y: f64,
    span_lat: f64,
}

impl Projection {
    fn fit(min: Coordinate, max: Coordinate, config: &RenderConfig) -> Self {
        let mid_lat = ((min.lat + max.lat) / 2.0).to_radians();
        let lng_factor = mid_lat.cos().max(1e-6);
        let span_lat = (max.lat - min.lat).max(1e-9);
        let span_x = ((max.lng - min.lng) * lng_factor).max(1e-9);
        let pad = config.padding as f64;
        let avail_w = (config.width as f64 - 2.0 * pad).max(1.0);
        let avail_h = (config.height as f64 - 2.0 * pad).max(1.0);
        let scale = (avail_w / span_x).min(avail_h / span_lat);
        Self {
            min,
            scale,
            lng_factor,
            offset_x: pad + (avail_w - span_x * scale) / 2.0,
            offset_y: pad + (avail_h - span_lat * scale) / 2.0,
            span_lat,
        }
    }

    fn project(&self, c: Coordinate) -> (f64, f64) {
        let x = self.offset_x + (c.lng - self.min.lng) * self.lng_factor * self.scale;
        // North up.
        let y = self.offset_y + (self.span_lat - (c.lat - self.min.lat)) * self.scale;
        (x, y)
    }
}

pub fn render_svg(
    view: &MapView<'_>,
    metrics: Option<&NetworkMetrics>,
    theme: &Theme,
    config: &RenderConfig,
) -> String {
    let width = config.width.max(200.0);
    let height = config.height.max(200.0);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));

    let all_points = view
        .network
        .points()
        .map(|(_, c)| c)
        .chain(view.connections.iter().flat_map(|c| [c.start, c.end]))
        .collect::<Vec<_>>();

    if let Some((min, max)) = bounds(&all_points) {
        let projection = Projection::fit(min, max, config);

        for kind in [PipelineKind::Empty, PipelineKind::Deployed] {
            let style = theme.pipeline_style(kind);
            for (idx, pipeline) in view.network.pipelines(kind).iter().enumerate() {
                let points: Vec<(f64, f64)> =
                    pipeline.iter().map(|c| projection.project(*c)).collect();
                svg.push_str(&polyline_svg(
                    &points,
                    style,
                    &format!("{}-{}", kind, idx),
                ));
            }
        }

        for (idx, conn) in view.connections.iter().enumerate() {
            let points = [projection.project(conn.start), projection.project(conn.end)];
            svg.push_str(&polyline_svg(
                &points,
                &theme.connection,
                &format!("connection-{idx}"),
            ));
        }

        let selected_pipeline = view.selected.map(SelectedPoint::pipeline);
        for (owner, coord) in view.network.points() {
            let (x, y) = projection.project(coord);
            let fill = if selected_pipeline == Some(owner) {
                theme.selected_marker.as_str()
            } else {
                theme.marker_color(owner.kind)
            };
            svg.push_str(&format!(
                "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{}\" fill=\"{fill}\" stroke-width=\"0\"/>",
                theme.marker_radius
            ));
        }
    }

    if let (Some(metrics), true) = (metrics, config.show_summary) {
        let line_height = theme.font_size as f64 * 1.4;
        for (idx, line) in format_summary(metrics).lines().enumerate() {
            let y = 12.0 + theme.font_size as f64 + idx as f64 * line_height;
            svg.push_str(&format!(
                "<text x=\"12\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                escape_xml(&theme.font_family),
                theme.font_size,
                theme.text_color,
                escape_xml(line)
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn polyline_svg(points: &[(f64, f64)], style: &StrokeStyle, id: &str) -> String {
    if points.is_empty() {
        return String::new();
    }
    let coords: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect();
    format!(
        "<polyline id=\"{id}\" points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
        coords.join(" "),
        style.color,
        style.opacity,
        style.weight
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
