//! Page geometry handed to the document composer: where the map image goes,
//! how large the raster must be, and the decorations drawn on top of it.
//! All page positions are millimetres from the top-left corner of the sheet.

use crate::api::grid_overlay::{GridAxis, GridOverlay, LabelEdge};
use crate::core::constants::{
    ATTRIBUTION, MM_PER_INCH, NICE_DISTANCES, POINTS_PER_INCH, SCALE_BAR_TARGET_MM,
};
use crate::core::paper::{DpiOption, Orientation, PaperFormat};
use crate::core::print_area::PrintFrameBounds;
use crate::core::validate::check_scale;
use crate::error::KortError;
use crate::util::format::format_danish;
use geo::BooleanOps;
use geo_types::{Coord, LineString, MultiLineString, Rect};
use serde::{Deserialize, Serialize};
use tracing::trace;

pub fn mm_to_pt(mm: f64) -> f64 {
    mm / MM_PER_INCH * POINTS_PER_INCH
}

pub fn mm_to_px(mm: f64, dpi: DpiOption) -> u32 {
    (mm / MM_PER_INCH * dpi.value() as f64).round() as u32
}

/// Sheet size, map rectangle and raster size for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
    pub map_width_mm: f64,
    pub map_height_mm: f64,
    pub canvas_width_px: u32,
    pub canvas_height_px: u32,
}

impl PageLayout {
    pub fn new(
        format: PaperFormat,
        orientation: Orientation,
        dpi: DpiOption,
        margin_mm: f64,
    ) -> Result<Self, KortError> {
        let (page_width_mm, page_height_mm) = format.oriented_mm(orientation);
        let max_mm = page_width_mm.min(page_height_mm) / 2.0;
        if !margin_mm.is_finite() || margin_mm < 0.0 || margin_mm >= max_mm {
            return Err(KortError::InvalidMargin { margin_mm, max_mm });
        }

        let map_width_mm = page_width_mm - 2.0 * margin_mm;
        let map_height_mm = page_height_mm - 2.0 * margin_mm;

        Ok(Self {
            page_width_mm,
            page_height_mm,
            margin_mm,
            map_width_mm,
            map_height_mm,
            canvas_width_px: mm_to_px(map_width_mm, dpi),
            canvas_height_px: mm_to_px(map_height_mm, dpi),
        })
    }

    /// The printable map rectangle on the sheet.
    pub fn map_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.margin_mm,
                y: self.margin_mm,
            },
            Coord {
                x: self.margin_mm + self.map_width_mm,
                y: self.margin_mm + self.map_height_mm,
            },
        )
    }
}

/// Rounds a ground distance to a scale-bar friendly value.
///
/// Picks the first of 1, 2, 5, 10 ... 100 000 m that reaches 40% of `value`.
pub fn nice_number(value: f64) -> f64 {
    NICE_DISTANCES
        .iter()
        .copied()
        .find(|&n| n >= value * 0.4)
        .unwrap_or(NICE_DISTANCES[NICE_DISTANCES.len() - 1])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBar {
    /// Ground distance represented by the bar
    pub distance_m: f64,
    pub length_mm: f64,
    /// Left end of the bar
    pub x_mm: f64,
    pub y_mm: f64,
    pub label: String,
}

impl ScaleBar {
    /// Scale bar in the lower-left corner of the map, about 40 mm long.
    pub fn new(layout: &PageLayout, scale: f64) -> Result<Self, KortError> {
        check_scale(scale)?;
        let target_m = SCALE_BAR_TARGET_MM * scale / 1000.0;
        let distance_m = nice_number(target_m);
        let length_mm = distance_m * 1000.0 / scale;

        let label = if distance_m >= 1000.0 {
            format!("{} km", distance_m / 1000.0)
        } else {
            format!("{} m", distance_m)
        };

        Ok(Self {
            distance_m,
            length_mm,
            x_mm: layout.margin_mm + 5.0,
            y_mm: layout.margin_mm + layout.map_height_mm - 5.0,
            label,
        })
    }
}

/// North arrow triangle and its `N`, rotated to match the map bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NorthArrow {
    pub center: (f64, f64),
    pub tip: (f64, f64),
    pub left: (f64, f64),
    pub right: (f64, f64),
    pub label_position: (f64, f64),
    pub rotation_deg: f64,
}

impl NorthArrow {
    const SIZE_MM: f64 = 4.0;

    /// Arrow in the top-right corner of the map for a map turned by `bearing_deg`.
    pub fn new(layout: &PageLayout, bearing_deg: f64) -> Self {
        let cx = layout.margin_mm + layout.map_width_mm - 8.0;
        let cy = layout.margin_mm + 12.0;
        let size = Self::SIZE_MM;

        // North sits at -bearing on a map rotated by bearing. Page y points down,
        // so this rotation matrix turns clockwise for positive angles.
        let rotation_deg = -bearing_deg;
        let (sin, cos) = rotation_deg.to_radians().sin_cos();
        let place = |dx: f64, dy: f64| (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos);

        Self {
            center: (cx, cy),
            tip: place(0.0, -size),
            left: place(-size / 2.0, size / 2.0),
            right: place(size / 2.0, size / 2.0),
            label_position: place(0.0, -size - 1.5),
            rotation_deg,
        }
    }
}

/// Scale text and data attribution along the bottom of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub scale_text: String,
    pub scale_position: (f64, f64),
    pub attribution: String,
    /// Right-aligned anchor of the attribution
    pub attribution_position: (f64, f64),
    /// Grid reference of the page in a multi-page print
    pub page_label: Option<String>,
}

impl Footer {
    pub fn new(layout: &PageLayout, scale: f64, page_label: Option<&str>) -> Self {
        let y = layout.page_height_mm - 4.0;
        Self {
            scale_text: format!("1:{}", format_danish(scale, 0)),
            scale_position: (layout.margin_mm, y),
            attribution: ATTRIBUTION.to_string(),
            attribution_position: (layout.page_width_mm - layout.margin_mm, y),
            page_label: page_label.map(str::to_string),
        }
    }
}

/// File name for the generated document, e.g. `kort_1-25k_A4.pdf`.
pub fn output_file_name(scale: f64, format: PaperFormat, page_label: Option<&str>) -> String {
    let scale_str = if scale >= 1000.0 {
        format!("{}k", scale / 1000.0)
    } else {
        format!("{}", scale)
    };
    match page_label {
        Some(label) => format!("kort_1{}_{}_{}.pdf", scale_str, format, label),
        None => format!("kort_1{}_{}.pdf", scale_str, format),
    }
}

/// A grid line in page millimetres, clipped to the map rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGridLine {
    pub axis: GridAxis,
    pub value: f64,
    pub label: String,
    pub segments: MultiLineString<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGridLabel {
    pub edge: LabelEdge,
    pub text: String,
    pub x_mm: f64,
    pub y_mm: f64,
}

/// Maps lng/lat inside `bounds` onto the map rectangle of a page.
///
/// Horizontal placement is linear in longitude. Vertical placement follows
/// Web Mercator, matching a raster rendered by fitting `bounds` into the
/// canvas.
#[derive(Debug, Clone, Copy)]
pub struct PageProjector {
    bounds: PrintFrameBounds,
    layout: PageLayout,
    merc_north: f64,
    merc_south: f64,
}

fn mercator_y(lat: f64) -> f64 {
    (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln()
}

impl PageProjector {
    pub fn new(bounds: &PrintFrameBounds, layout: &PageLayout) -> Self {
        Self {
            bounds: *bounds,
            layout: *layout,
            merc_north: mercator_y(bounds.north),
            merc_south: mercator_y(bounds.south),
        }
    }

    pub fn to_page(&self, lng: f64, lat: f64) -> Coord<f64> {
        let fx = (lng - self.bounds.west) / self.bounds.width_deg();
        let fy = (self.merc_north - mercator_y(lat)) / (self.merc_north - self.merc_south);
        Coord {
            x: self.layout.margin_mm + fx * self.layout.map_width_mm,
            y: self.layout.margin_mm + fy * self.layout.map_height_mm,
        }
    }
}

/// Grid lines and edge labels of `overlay` in page space for a static document.
pub fn page_grid_lines(
    overlay: &GridOverlay,
    bounds: &PrintFrameBounds,
    layout: &PageLayout,
) -> (Vec<PageGridLine>, Vec<PageGridLabel>) {
    let projector = PageProjector::new(bounds, layout);
    let clip = layout.map_rect().to_polygon();

    let lines: Vec<PageGridLine> = overlay
        .lines()
        .iter()
        .filter_map(|line| {
            let page_line: LineString<f64> = line
                .line
                .coords()
                .map(|c| projector.to_page(c.x, c.y))
                .collect();
            let segments = clip.clip(&MultiLineString::new(vec![page_line]), false);
            if segments.0.is_empty() {
                return None;
            }
            Some(PageGridLine {
                axis: line.axis,
                value: line.value,
                label: line.label.clone(),
                segments,
            })
        })
        .collect();

    let labels: Vec<PageGridLabel> = overlay
        .labels()
        .iter()
        .map(|label| {
            let c = projector.to_page(label.position.lng, label.position.lat);
            PageGridLabel {
                edge: label.edge,
                text: label.text.clone(),
                x_mm: c.x,
                y_mm: c.y,
            }
        })
        .collect();

    trace!(lines = lines.len(), labels = labels.len(), "page grid projected");
    (lines, labels)
}
