use crate::collab::{Clipboard, LogNotifier, StdoutClipboard, copy_map_clicks};
use crate::config::{Config, load_config};
use crate::costs::{extract_table_data, format_cost_table};
use crate::network::{NetworkFile, load_network_or_default, parse_network, validate_connections};
use crate::prompt::{format_summary, generate_prompt, resolve_prompt_address};
use crate::render::{MapView, render_svg, write_output_svg};
use crate::report::{Report, write_report};
use crate::session::Session;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "conduit",
    version,
    about = "Connect deployed and vacant telecom conduits and size the result"
)]
pub struct Args {
    /// Network file (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the report. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Config JSON file (theme, map, render and geocoder settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Address to use for the prompt instead of geocoding the centroid
    #[arg(short = 'a', long = "address")]
    pub address: Option<String>,

    /// Render the network overview to this file (.svg or .png)
    #[arg(short = 'r', long = "render")]
    pub render: Option<PathBuf>,

    /// Model reply (markdown) to extract the cost comparison table from
    #[arg(long = "analysis")]
    pub analysis: Option<PathBuf>,

    /// Width of the rendered overview
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height of the rendered overview
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Summary lines followed by the prompt
    Text,
    /// The prompt only
    Prompt,
    /// Full JSON report
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let file = read_network(args.input.as_deref())?;
    let mut session = Session::with_connections(file.connections);
    let map_clicks = session.replay(&file.actions);

    let geocoder = config.geocoder.build();
    let mut clipboard = address_clipboard(&args);
    copy_map_clicks(&map_clicks, geocoder.as_ref(), clipboard.as_mut(), &mut LogNotifier);

    validate_connections(&file.network, session.connections())?;
    let analysis = session.analyze(&file.network)?;
    let metrics = &analysis.metrics;
    let address = resolve_prompt_address(&metrics.connected_coordinates, geocoder.as_ref());
    let prompt = generate_prompt(
        &address,
        metrics.connected_deployed,
        metrics.connected_empty,
        metrics.connection_distance,
    );

    match args.format {
        OutputFormat::Text => {
            write_text(
                &format!("{}\n\n{}\n", format_summary(metrics), prompt),
                args.output.as_deref(),
            )?;
        }
        OutputFormat::Prompt => {
            write_text(&format!("{prompt}\n"), args.output.as_deref())?;
        }
        OutputFormat::Json => {
            let report = Report::new(&analysis, session.connections(), &address, &prompt);
            write_report(args.output.as_deref(), &report)?;
        }
    }

    if let Some(path) = args.render.as_deref() {
        let view = MapView {
            network: &file.network,
            connections: session.connections(),
            selected: session.selected(),
        };
        let svg = render_svg(&view, Some(metrics), &config.theme, &config.render);
        write_render(&svg, path, &config)?;
    }

    if let Some(path) = args.analysis.as_deref() {
        let reply = std::fs::read_to_string(path)?;
        match extract_table_data(&reply) {
            Some(table) => print!("\n{}", format_cost_table(&table)),
            None => println!("\nNo cost data available yet."),
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(address) = &args.address {
        config.geocoder.address = Some(address.clone());
    }
}

/// Copied addresses go to stdout unless a JSON report is being printed there.
fn address_clipboard(args: &Args) -> Box<dyn Clipboard> {
    if args.output.is_none() && args.format == OutputFormat::Json {
        Box::new(StdoutClipboard::with_writer(io::stderr()))
    } else {
        Box::new(StdoutClipboard::new())
    }
}

fn read_network(path: Option<&Path>) -> Result<NetworkFile> {
    match path {
        Some(path) if path != Path::new("-") => {
            Ok(load_network_or_default(path, &mut LogNotifier))
        }
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(parse_network(&buf)?)
        }
    }
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn write_render(svg: &str, path: &Path, config: &Config) -> Result<()> {
    if is_png(path) {
        return write_png(svg, path, config);
    }
    write_output_svg(svg, Some(path))
}

#[cfg(feature = "png")]
fn write_png(svg: &str, path: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, path, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, path: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the 'png' feature (got {})",
        path.display()
    ))
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}
