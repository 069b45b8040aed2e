use crate::collab::{Clipboard, Geocoder, Notification, Notifier};
use crate::geodesy::centroid;
use crate::metrics::NetworkMetrics;
use crate::model::Coordinate;

/// Address used when no deployed-bearing component exists yet.
pub const UNKNOWN_LOCATION: &str = "[location]";
/// Address used when the centroid could not be geocoded.
pub const GEOCODE_FALLBACK: &str = "[nearest available location]";

pub fn generate_prompt(
    address: &str,
    connected_deployed: f64,
    connected_empty: f64,
    connection_distance: f64,
) -> String {
    format!(
        "I need a structured feasibility analysis for a networking pipeline deployment project in {address}.\n\n\
         There is an existing pipeline that is {connected_deployed:.2} meters in length and an unused pipeline \
         (canalization) {connection_distance:.2} meters away, with a length of {connected_empty:.2} meters."
    )
}

/// Resolves the address of the planar centroid of `coords`, substituting
/// the placeholder addresses when there is nothing to locate or the lookup
/// fails.
pub fn resolve_prompt_address(coords: &[Coordinate], geocoder: &dyn Geocoder) -> String {
    let Some(center) = centroid(coords) else {
        return UNKNOWN_LOCATION.to_string();
    };
    match geocoder.resolve_address(center.lat, center.lng) {
        Ok(address) => address,
        Err(err) => {
            log::warn!("geocoding failed for centroid {:.6}, {:.6}: {err}", center.lat, center.lng);
            GEOCODE_FALLBACK.to_string()
        }
    }
}

/// Resolves the centroid address and renders the prompt for `metrics`.
pub fn prompt_for(metrics: &NetworkMetrics, geocoder: &dyn Geocoder) -> String {
    let address = resolve_prompt_address(&metrics.connected_coordinates, geocoder);
    generate_prompt(
        &address,
        metrics.connected_deployed,
        metrics.connected_empty,
        metrics.connection_distance,
    )
}

/// Builds the prompt and copies it, reporting the outcome to `notifier`.
pub fn copy_prompt(
    metrics: &NetworkMetrics,
    geocoder: &dyn Geocoder,
    clipboard: &mut dyn Clipboard,
    notifier: &mut dyn Notifier,
) -> Option<String> {
    let prompt = prompt_for(metrics, geocoder);
    match clipboard.write_text(&prompt) {
        Ok(()) => {
            notifier.notify(Notification::info("Prompt Copied!", prompt.clone(), 5000));
            Some(prompt)
        }
        Err(err) => {
            log::warn!("copy prompt: {err}");
            notifier.notify(Notification::error(
                "Copy Failed",
                "Failed to copy prompt to clipboard",
            ));
            None
        }
    }
}

/// The three figures shown above the map, one per line.
pub fn format_summary(metrics: &NetworkMetrics) -> String {
    format!(
        "Deployed Pipeline Length: {:.2}m\nEmpty Pipeline (Canalization) Length: {:.2}m\nConnection Distance: {:.2}m",
        metrics.connected_deployed, metrics.connected_empty, metrics.connection_distance
    )
}
