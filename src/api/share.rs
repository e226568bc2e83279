//! Compact query-string encoding of the map view and print settings, used
//! for shareable links.
//!
//! ```
//! use kortprint_rs::api::share::ShareState;
//!
//! let state = ShareState::from_query_string("c=56.16290%2C10.20390%2C12.0&s=50000&o=l");
//! assert_eq!(state.scale, Some(50000.0));
//! assert_eq!(state.to_query_string(), "c=56.16290%2C10.20390%2C12.0&s=50000&o=l");
//! ```

use crate::api::print_plan::PrintRequest;
use crate::core::paper::{DpiOption, Orientation, PaperFormat};
use crate::util::coord::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{trace, warn};

/// Background map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseLayer {
    Skaermkort,
    Ortofoto,
    Osm,
    Dtk25,
    HistoriskHoeje,
    HistoriskLave,
}

impl BaseLayer {
    pub const ALL: [BaseLayer; 6] = [
        BaseLayer::Skaermkort,
        BaseLayer::Ortofoto,
        BaseLayer::Osm,
        BaseLayer::Dtk25,
        BaseLayer::HistoriskHoeje,
        BaseLayer::HistoriskLave,
    ];

    pub fn code(self) -> &'static str {
        match self {
            BaseLayer::Skaermkort => "sk",
            BaseLayer::Ortofoto => "of",
            BaseLayer::Osm => "osm",
            BaseLayer::Dtk25 => "dtk",
            BaseLayer::HistoriskHoeje => "hh",
            BaseLayer::HistoriskLave => "hl",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BaseLayer::Skaermkort => "skaermkort",
            BaseLayer::Ortofoto => "ortofoto",
            BaseLayer::Osm => "osm",
            BaseLayer::Dtk25 => "dtk25",
            BaseLayer::HistoriskHoeje => "historisk_hoeje",
            BaseLayer::HistoriskLave => "historisk_lave",
        }
    }

    /// Accepts the short code or the full name.
    pub fn from_code(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.code() == s || layer.name() == s)
    }
}

impl fmt::Display for BaseLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vector style of the screen map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStyle {
    #[default]
    Klassisk,
    Daempet,
    Graa,
    Moerkt,
}

impl MapStyle {
    pub const ALL: [MapStyle; 4] = [
        MapStyle::Klassisk,
        MapStyle::Daempet,
        MapStyle::Graa,
        MapStyle::Moerkt,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MapStyle::Klassisk => "kl",
            MapStyle::Daempet => "da",
            MapStyle::Graa => "gr",
            MapStyle::Moerkt => "mo",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MapStyle::Klassisk => "klassisk",
            MapStyle::Daempet => "daempet",
            MapStyle::Graa => "graa",
            MapStyle::Moerkt => "moerkt",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.code() == s || style.name() == s)
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// View and print parameters carried in a link. Every field is optional;
/// absent fields keep whatever the receiver already has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareState {
    pub center: Option<GeoPoint>,
    pub zoom: Option<f64>,
    pub bearing: Option<f64>,
    pub base_layer: Option<BaseLayer>,
    pub style: Option<MapStyle>,
    pub scale: Option<f64>,
    pub format: Option<PaperFormat>,
    pub orientation: Option<Orientation>,
    pub dpi: Option<DpiOption>,
}

impl ShareState {
    /// Captures the print settings of `request` together with a map zoom.
    pub fn from_request(request: &PrintRequest, zoom: f64) -> Self {
        Self {
            center: Some(request.center),
            zoom: Some(zoom),
            bearing: Some(request.bearing_deg),
            base_layer: None,
            style: None,
            scale: Some(request.scale),
            format: Some(request.format),
            orientation: Some(request.orientation),
            dpi: Some(request.dpi),
        }
    }

    /// Overrides the fields of `request` that this state carries.
    pub fn apply_to(&self, request: &PrintRequest) -> PrintRequest {
        let mut request = request.clone();
        if let Some(center) = self.center {
            request.center = center;
        }
        if let Some(bearing) = self.bearing {
            request.bearing_deg = bearing;
        }
        if let Some(scale) = self.scale {
            request.scale = scale;
        }
        if let Some(format) = self.format {
            request.format = format;
        }
        if let Some(orientation) = self.orientation {
            request.orientation = orientation;
        }
        if let Some(dpi) = self.dpi {
            request.dpi = dpi;
        }
        request
    }

    pub fn to_query_string(&self) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();

        // Centre is only meaningful together with a zoom
        if let (Some(center), Some(zoom)) = (self.center, self.zoom) {
            params.push(("c", format!("{:.5},{:.5},{:.1}", center.lat, center.lng, zoom)));
        }
        if let Some(bearing) = self.bearing.filter(|b| *b != 0.0) {
            params.push(("b", (bearing.round() as i64).to_string()));
        }
        if let Some(layer) = self.base_layer {
            params.push(("l", layer.code().to_string()));
        }
        if let Some(style) = self.style {
            params.push(("v", style.code().to_string()));
        }
        if let Some(scale) = self.scale {
            params.push(("s", scale.to_string()));
        }
        if let Some(format) = self.format {
            params.push(("f", format.to_string()));
        }
        if let Some(orientation) = self.orientation {
            let code = match orientation {
                Orientation::Portrait => "p",
                Orientation::Landscape => "l",
            };
            params.push(("o", code.to_string()));
        }
        if let Some(dpi) = self.dpi {
            params.push(("d", dpi.value().to_string()));
        }

        params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parses a query string, with or without the leading `?`.
    ///
    /// Values that are malformed or out of range are dropped with a warning
    /// and the rest of the state is still returned.
    pub fn from_query_string(query: &str) -> Self {
        let mut state = Self::default();

        for pair in query.trim_start_matches('?').split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let value = match urlencoding::decode(&raw.replace('+', " ")) {
                Ok(value) => value.into_owned(),
                Err(e) => {
                    warn!(key, error = %e, "dropping undecodable share parameter");
                    continue;
                }
            };
            if value.is_empty() {
                continue;
            }

            let accepted = match key {
                "c" => parse_center(&value).map(|(center, zoom)| {
                    state.center = Some(center);
                    state.zoom = Some(zoom);
                }),
                "b" => parse_finite(&value).map(|b| state.bearing = Some(b)),
                "l" => BaseLayer::from_code(&value).map(|l| state.base_layer = Some(l)),
                "v" => MapStyle::from_code(&value).map(|v| state.style = Some(v)),
                "s" => parse_finite(&value)
                    .filter(|s| *s > 0.0)
                    .map(|s| state.scale = Some(s)),
                "f" => value.parse::<PaperFormat>().ok().map(|f| state.format = Some(f)),
                "o" => match value.as_str() {
                    "p" => Some(Orientation::Portrait),
                    "l" => Some(Orientation::Landscape),
                    _ => None,
                }
                .map(|o| state.orientation = Some(o)),
                "d" => value
                    .parse::<u32>()
                    .ok()
                    .and_then(|d| DpiOption::try_from(d).ok())
                    .map(|d| state.dpi = Some(d)),
                _ => {
                    trace!(key, "ignoring unknown share parameter");
                    Some(())
                }
            };

            if accepted.is_none() {
                warn!(key, value = %value, "dropping malformed share parameter");
            }
        }

        state
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `lat,lng,zoom`; extra trailing parts are ignored.
fn parse_center(s: &str) -> Option<(GeoPoint, f64)> {
    let parts: Vec<f64> = s.split(',').map(parse_finite).collect::<Option<_>>()?;
    if parts.len() < 3 {
        return None;
    }
    Some((GeoPoint::new(parts[1], parts[0]), parts[2]))
}
