use crate::core::print_area::PrintFrameBounds;
use crate::core::utm::{grid_interval, latlng_to_utm, utm_to_latlng, utm_zone};
use crate::core::validate::check_zone;
use crate::error::KortError;
use crate::util::coord::GeoPoint;
use geo_types::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Most grid lines a single overlay may hold, eastings and northings together.
pub const MAX_GRID_LINES: usize = 10_000;

/// Which UTM coordinate a grid line holds constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridAxis {
    /// Line of constant easting (runs roughly north-south)
    Easting,
    /// Line of constant northing (runs roughly east-west)
    Northing,
}

impl GridAxis {
    pub fn as_str(self) -> &'static str {
        match self {
            GridAxis::Easting => "easting",
            GridAxis::Northing => "northing",
        }
    }
}

/// Box edge a grid label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelEdge {
    Bottom,
    Top,
    Left,
    Right,
}

impl LabelEdge {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelEdge::Bottom => "bottom",
            LabelEdge::Top => "top",
            LabelEdge::Left => "left",
            LabelEdge::Right => "right",
        }
    }
}

/// Corners projected to find the UTM range covered by the grid.
///
/// `SouthWestNorthEast` only projects two corners. Because UTM lines are
/// not parallel to meridians this can leave a sliver of the box uncovered
/// away from the central meridian. `AllCorners` projects all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CornerSampling {
    #[default]
    SouthWestNorthEast,
    AllCorners,
}

/// A grid line sampled densely enough to follow projection curvature.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLineFeature {
    pub axis: GridAxis,
    /// The constant easting or northing in metres
    pub value: f64,
    /// Value in whole kilometres, e.g. `"574"`
    pub label: String,
    /// lng/lat polyline, at least two points
    pub line: LineString<f64>,
}

/// A grid value annotation where a grid line meets an edge of the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLabel {
    pub axis: GridAxis,
    pub edge: LabelEdge,
    pub value: f64,
    pub text: String,
    pub position: GeoPoint,
}

/// Grid-aligned UTM rectangle, every bound a multiple of the interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmExtent {
    pub min_easting: f64,
    pub max_easting: f64,
    pub min_northing: f64,
    pub max_northing: f64,
}

/// UTM grid lines and edge labels covering a geographic box.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOverlay {
    zone: u8,
    interval: f64,
    bounds: PrintFrameBounds,
    extent: UtmExtent,
    lines: Vec<GridLineFeature>,
    labels: Vec<GridLabel>,
}

impl GridOverlay {
    pub fn builder() -> GridOverlayBuilder {
        GridOverlayBuilder::new()
    }

    pub fn from_bounds(bounds: &PrintFrameBounds, zone: u8, interval: f64) -> Result<Self, KortError> {
        Self::builder().bounds(bounds).zone(zone).interval(interval).build()
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn bounds(&self) -> &PrintFrameBounds {
        &self.bounds
    }

    pub fn extent(&self) -> &UtmExtent {
        &self.extent
    }

    pub fn lines(&self) -> &[GridLineFeature] {
        &self.lines
    }

    pub fn labels(&self) -> &[GridLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines_along(&self, axis: GridAxis) -> impl Iterator<Item = &GridLineFeature> {
        self.lines.iter().filter(move |l| l.axis == axis)
    }

    pub fn labels_on(&self, edge: LabelEdge) -> impl Iterator<Item = &GridLabel> {
        self.labels.iter().filter(move |l| l.edge == edge)
    }

    /// GeoJSON source for an interactive map layer.
    ///
    /// Lines carry `type` = `easting`/`northing`, labels carry
    /// `type` = `label-easting`/`label-northing` plus the `edge` they sit on.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut features = Vec::with_capacity(self.lines.len() + self.labels.len());

        for line in &self.lines {
            let mut props = JsonObject::new();
            props.insert("type".to_string(), line.axis.as_str().into());
            props.insert("value".to_string(), line.value.into());
            props.insert("label".to_string(), line.label.clone().into());
            features.push(feature(Value::from(&line.line), props));
        }

        for label in &self.labels {
            let mut props = JsonObject::new();
            props.insert(
                "type".to_string(),
                format!("label-{}", label.axis.as_str()).into(),
            );
            props.insert("edge".to_string(), label.edge.as_str().into());
            props.insert("value".to_string(), label.value.into());
            props.insert("label".to_string(), label.text.clone().into());
            let point: Point<f64> = label.position.into();
            features.push(feature(Value::from(&point), props));
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[derive(Debug, Default)]
pub struct GridOverlayBuilder {
    bounds: Option<PrintFrameBounds>,
    zone: Option<u8>,
    interval: Option<f64>,
    scale: Option<f64>,
    corners: CornerSampling,
}

impl GridOverlayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(mut self, bounds: &PrintFrameBounds) -> Self {
        self.bounds = Some(*bounds);
        self
    }

    /// Forces a zone. Defaults to the zone of the box centre.
    pub fn zone(mut self, zone: u8) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Grid spacing in metres. Takes precedence over [`Self::scale`].
    pub fn interval(mut self, interval: f64) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Derives the spacing from a scale denominator via [`grid_interval`].
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn corner_sampling(mut self, corners: CornerSampling) -> Self {
        self.corners = corners;
        self
    }

    pub fn build(self) -> Result<GridOverlay, KortError> {
        let bounds = self.bounds.ok_or(KortError::MissingParameter("bounds"))?;
        let interval = match (self.interval, self.scale) {
            (Some(interval), _) => interval,
            (None, Some(scale)) => grid_interval(scale)?,
            (None, None) => return Err(KortError::MissingParameter("interval or scale")),
        };
        if !interval.is_finite() || interval <= 0.0 {
            return Err(KortError::InvalidInterval(interval));
        }
        let zone = match self.zone {
            Some(zone) => {
                check_zone(zone)?;
                zone
            }
            None => utm_zone(bounds.center().lng)?,
        };

        build_overlay(bounds, zone, interval, self.corners)
    }
}

fn utm_extent(
    bounds: &PrintFrameBounds,
    zone: u8,
    interval: f64,
    corners: CornerSampling,
) -> Result<UtmExtent, KortError> {
    let points = match corners {
        CornerSampling::SouthWestNorthEast => vec![bounds.south_west(), bounds.north_east()],
        CornerSampling::AllCorners => bounds.corners().to_vec(),
    };

    let mut projected = Vec::with_capacity(points.len());
    for p in &points {
        projected.push(latlng_to_utm(p.lat, p.lng, Some(zone))?);
    }

    let (min_e, max_e, min_n, max_n) = match corners {
        // Easting range from west to east corner, northing from south to north
        CornerSampling::SouthWestNorthEast => (
            projected[0].easting,
            projected[1].easting,
            projected[0].northing,
            projected[1].northing,
        ),
        CornerSampling::AllCorners => projected.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(min_e, max_e, min_n, max_n), u| {
                (
                    min_e.min(u.easting),
                    max_e.max(u.easting),
                    min_n.min(u.northing),
                    max_n.max(u.northing),
                )
            },
        ),
    };

    Ok(UtmExtent {
        min_easting: (min_e / interval).floor() * interval,
        max_easting: (max_e / interval).ceil() * interval,
        min_northing: (min_n / interval).floor() * interval,
        max_northing: (max_n / interval).ceil() * interval,
    })
}

/// Values `min, min + step, ..., max` without accumulating float error.
fn stepped(min: f64, max: f64, step: f64) -> Vec<f64> {
    let count = ((max - min) / step).round().max(0.0) as usize;
    (0..=count).map(|i| min + i as f64 * step).collect()
}

fn sample_line(
    axis: GridAxis,
    value: f64,
    extent: &UtmExtent,
    zone: u8,
    step: f64,
) -> Result<Option<GridLineFeature>, KortError> {
    let coords = match axis {
        GridAxis::Easting => stepped(extent.min_northing, extent.max_northing, step)
            .into_iter()
            .map(|n| utm_to_latlng(value, n, zone).map(Coord::from))
            .collect::<Result<Vec<_>, _>>()?,
        GridAxis::Northing => stepped(extent.min_easting, extent.max_easting, step)
            .into_iter()
            .map(|e| utm_to_latlng(e, value, zone).map(Coord::from))
            .collect::<Result<Vec<_>, _>>()?,
    };

    if coords.len() < 2 {
        return Ok(None);
    }

    Ok(Some(GridLineFeature {
        axis,
        value,
        label: format!("{}", (value / 1000.0).round() as i64),
        line: LineString::from(coords),
    }))
}

/// First point where the polyline crosses `target` on the chosen coordinate.
fn crossing(line: &LineString<f64>, target: f64, along_y: bool) -> Option<Coord<f64>> {
    let pick = |c: &Coord<f64>| if along_y { c.y } else { c.x };
    line.lines().find_map(|seg| {
        let (a, b) = (pick(&seg.start), pick(&seg.end));
        if a == b || (a - target) * (b - target) > 0.0 {
            return None;
        }
        let t = (target - a) / (b - a);
        Some(Coord {
            x: seg.start.x + t * (seg.end.x - seg.start.x),
            y: seg.start.y + t * (seg.end.y - seg.start.y),
        })
    })
}

fn edge_labels(line: &GridLineFeature, bounds: &PrintFrameBounds) -> Vec<GridLabel> {
    let edges: [(LabelEdge, f64, bool); 2] = match line.axis {
        GridAxis::Easting => [
            (LabelEdge::Bottom, bounds.south, true),
            (LabelEdge::Top, bounds.north, true),
        ],
        GridAxis::Northing => [
            (LabelEdge::Left, bounds.west, false),
            (LabelEdge::Right, bounds.east, false),
        ],
    };

    edges
        .iter()
        .filter_map(|&(edge, target, along_y)| {
            let hit = crossing(&line.line, target, along_y)?;
            let inside = if along_y {
                hit.x >= bounds.west && hit.x <= bounds.east
            } else {
                hit.y >= bounds.south && hit.y <= bounds.north
            };
            inside.then(|| GridLabel {
                axis: line.axis,
                edge,
                value: line.value,
                text: line.label.clone(),
                position: GeoPoint::from(hit),
            })
        })
        .collect()
}

fn build_overlay(
    bounds: PrintFrameBounds,
    zone: u8,
    interval: f64,
    corners: CornerSampling,
) -> Result<GridOverlay, KortError> {
    let extent = utm_extent(&bounds, zone, interval, corners)?;
    let line_count = ((extent.max_easting - extent.min_easting) / interval).round()
        + ((extent.max_northing - extent.min_northing) / interval).round()
        + 2.0;
    if line_count > MAX_GRID_LINES as f64 {
        return Err(KortError::InvalidInterval(interval));
    }
    let step = interval / 4.0;

    let mut jobs: Vec<(GridAxis, f64)> = stepped(extent.min_easting, extent.max_easting, interval)
        .into_iter()
        .map(|e| (GridAxis::Easting, e))
        .collect();
    jobs.extend(
        stepped(extent.min_northing, extent.max_northing, interval)
            .into_iter()
            .map(|n| (GridAxis::Northing, n)),
    );

    let lines: Vec<GridLineFeature> = jobs
        .par_iter()
        .map(|&(axis, value)| sample_line(axis, value, &extent, zone, step))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect();

    let labels: Vec<GridLabel> = lines
        .iter()
        .flat_map(|line| edge_labels(line, &bounds))
        .collect();

    debug!(
        zone,
        interval,
        lines = lines.len(),
        labels = labels.len(),
        "grid overlay built"
    );

    Ok(GridOverlay {
        zone,
        interval,
        bounds,
        extent,
        lines,
        labels,
    })
}
