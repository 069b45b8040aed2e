//! Seams for the I/O collaborators around the core: map click events,
//! reverse geocoding, the clipboard and user-visible notifications.
//!
//! Failures from these never reach the aggregation code. They are caught at
//! the call site, logged, and surfaced as a [`Notification`].

use crate::error::CollabError;
use crate::geodesy::distance;
use crate::model::Coordinate;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// What a click handler needs from a mapping SDK's event object.
pub trait MapEvent {
    fn coordinates(&self) -> Option<Coordinate>;
    fn stop_propagation(&mut self);
}

/// Plain event used when replaying recorded sessions and in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClickEvent {
    pub coord: Option<Coordinate>,
    pub propagation_stopped: bool,
}

impl ClickEvent {
    pub fn at(coord: Coordinate) -> Self {
        Self {
            coord: Some(coord),
            propagation_stopped: false,
        }
    }
}

impl MapEvent for ClickEvent {
    fn coordinates(&self) -> Option<Coordinate> {
        self.coord
    }

    fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

pub trait Geocoder {
    fn resolve_address(&self, lat: f64, lng: f64) -> Result<String, CollabError>;
}

/// Answers every lookup with the same address.
#[derive(Debug, Clone)]
pub struct FixedGeocoder {
    pub address: String,
}

impl FixedGeocoder {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl Geocoder for FixedGeocoder {
    fn resolve_address(&self, _lat: f64, _lng: f64) -> Result<String, CollabError> {
        Ok(self.address.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    #[serde(flatten)]
    pub coord: Coordinate,
}

/// Offline reverse geocoder returning the nearest known place within range.
#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder {
    pub places: Vec<Place>,
    pub max_distance_m: f64,
}

impl GazetteerGeocoder {
    pub fn new(places: Vec<Place>, max_distance_m: f64) -> Self {
        Self {
            places,
            max_distance_m,
        }
    }
}

impl Geocoder for GazetteerGeocoder {
    fn resolve_address(&self, lat: f64, lng: f64) -> Result<String, CollabError> {
        let target = Coordinate::new(lat, lng);
        self.places
            .iter()
            .map(|place| (place, distance(place.coord, target)))
            .filter(|(_, d)| *d <= self.max_distance_m)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(place, _)| place.name.clone())
            .ok_or(CollabError::NoAddress { lat, lng })
    }
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CollabError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CollabError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Prints copied text, one entry per line, for terminals without a
/// system clipboard.
#[derive(Debug)]
pub struct StdoutClipboard<W: Write = io::Stdout> {
    out: W,
}

impl StdoutClipboard {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdoutClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutClipboard<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for StdoutClipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), CollabError> {
        writeln!(self.out, "{text}")
            .and_then(|()| self.out.flush())
            .map_err(|err| CollabError::Clipboard(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    pub duration_ms: u64,
}

impl Notification {
    pub fn info(title: &str, description: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Default,
            duration_ms,
        }
    }

    pub fn error(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
            duration_ms: 3000,
        }
    }
}

pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Sends notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Default => {
                log::info!("{}: {}", notification.title, notification.description)
            }
            NotificationVariant::Destructive => {
                log::warn!("{}: {}", notification.title, notification.description)
            }
        }
    }
}

/// Reverse-geocodes a clicked location and copies the address.
///
/// Returns the address on success. Either way the outcome is reported to the
/// notifier; errors are not propagated.
pub fn copy_address(
    coord: Coordinate,
    geocoder: &dyn Geocoder,
    clipboard: &mut dyn Clipboard,
    notifier: &mut dyn Notifier,
) -> Option<String> {
    let result = geocoder
        .resolve_address(coord.lat, coord.lng)
        .and_then(|address| clipboard.write_text(&address).map(|()| address));
    match result {
        Ok(address) => {
            notifier.notify(Notification::info("Address Copied!", address.clone(), 3000));
            Some(address)
        }
        Err(err) => {
            log::warn!("copy address at {:.6}, {:.6}: {err}", coord.lat, coord.lng);
            notifier.notify(Notification::error("Error", "Failed to copy address"));
            None
        }
    }
}

/// Copies the address of every map click in order, skipping failures.
pub fn copy_map_clicks(
    clicks: &[Coordinate],
    geocoder: &dyn Geocoder,
    clipboard: &mut dyn Clipboard,
    notifier: &mut dyn Notifier,
) -> Vec<String> {
    clicks
        .iter()
        .filter_map(|coord| copy_address(*coord, geocoder, clipboard, notifier))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), CollabError> {
            Err(CollabError::Clipboard("permission denied".to_string()))
        }
    }

    fn barcelona() -> GazetteerGeocoder {
        GazetteerGeocoder::new(
            vec![
                Place {
                    name: "Barcelona, Spain".to_string(),
                    coord: Coordinate::new(41.3851, 2.1734),
                },
                Place {
                    name: "Girona, Spain".to_string(),
                    coord: Coordinate::new(41.9794, 2.8214),
                },
            ],
            20_000.0,
        )
    }

    #[test]
    fn gazetteer_picks_nearest_place_in_range() {
        let geo = barcelona();
        assert_eq!(geo.resolve_address(41.40, 2.16).unwrap(), "Barcelona, Spain");
        assert_eq!(geo.resolve_address(41.95, 2.80).unwrap(), "Girona, Spain");
        assert!(matches!(
            geo.resolve_address(40.0, -3.7),
            Err(CollabError::NoAddress { .. })
        ));
    }

    #[test]
    fn copy_address_notifies_success() {
        let mut clipboard = MemoryClipboard::default();
        let mut notes: Vec<Notification> = Vec::new();
        let address = copy_address(
            Coordinate::new(41.39, 2.17),
            &barcelona(),
            &mut clipboard,
            &mut notes,
        );
        assert_eq!(address.as_deref(), Some("Barcelona, Spain"));
        assert_eq!(clipboard.contents.as_deref(), Some("Barcelona, Spain"));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Address Copied!");
        assert_eq!(notes[0].duration_ms, 3000);
    }

    #[test]
    fn copy_address_reports_clipboard_failure() {
        let mut notes: Vec<Notification> = Vec::new();
        let address = copy_address(
            Coordinate::new(41.39, 2.17),
            &barcelona(),
            &mut DeniedClipboard,
            &mut notes,
        );
        assert_eq!(address, None);
        assert_eq!(notes[0].variant, NotificationVariant::Destructive);
        assert_eq!(notes[0].description, "Failed to copy address");
    }

    #[test]
    fn stdout_clipboard_writes_each_copy_on_its_own_line() {
        let mut clipboard = StdoutClipboard::with_writer(Vec::new());
        let mut notes: Vec<Notification> = Vec::new();
        let copied = copy_map_clicks(
            &[
                Coordinate::new(41.39, 2.17),
                Coordinate::new(40.0, -3.7),
                Coordinate::new(41.95, 2.80),
            ],
            &barcelona(),
            &mut clipboard,
            &mut notes,
        );
        assert_eq!(copied, vec!["Barcelona, Spain", "Girona, Spain"]);
        assert_eq!(
            String::from_utf8(clipboard.into_inner()).unwrap(),
            "Barcelona, Spain\nGirona, Spain\n"
        );
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[1].variant, NotificationVariant::Destructive);
    }

    #[test]
    fn click_event_records_stop_propagation() {
        let mut event = ClickEvent::at(Coordinate::new(1.0, 2.0));
        assert!(!event.propagation_stopped);
        event.stop_propagation();
        assert!(event.propagation_stopped);
        assert_eq!(event.coordinates(), Some(Coordinate::new(1.0, 2.0)));
    }
}
