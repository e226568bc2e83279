//! From a print request to everything a document composer needs, page by page.

use crate::api::grid_overlay::{CornerSampling, GridOverlay};
use crate::api::page_layout::{
    Footer, NorthArrow, PageGridLabel, PageGridLine, PageLayout, ScaleBar, output_file_name,
    page_grid_lines,
};
use crate::core::constants::{
    DEFAULT_MARGIN_MM, DEFAULT_OVERLAP_MM, DEFAULT_SCALE, DENMARK_CENTER,
};
use crate::core::multipage::{MultiPageGridResult, PageCell, tile_print_area};
use crate::core::paper::{DpiOption, Orientation, PaperFormat};
use crate::core::print_area::{
    PrintFrameBounds, calculate_print_area, ground_extent_to_bounds, print_frame_polygon,
};
use crate::core::utm::utm_zone;
use crate::core::validate::check_finite;
use crate::error::KortError;
use crate::util::coord::GeoPoint;
use geo_types::Polygon;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything that decides what gets printed.
///
/// Missing fields take their defaults when deserialised, so `{}` is a valid
/// single A4 portrait page at 1:25 000 over central Denmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintRequest {
    pub center: GeoPoint,
    pub format: PaperFormat,
    pub orientation: Orientation,
    pub scale: f64,
    pub margin_mm: f64,
    pub dpi: DpiOption,
    pub bearing_deg: f64,
    pub cols: u32,
    pub rows: u32,
    pub overlap_mm: f64,
    /// Draw the UTM grid on every page
    pub grid: bool,
    /// Grid spacing in metres, derived from the scale when absent
    pub grid_interval: Option<f64>,
    pub grid_zone: Option<u8>,
    pub corner_sampling: CornerSampling,
}

impl Default for PrintRequest {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(DENMARK_CENTER.0, DENMARK_CENTER.1),
            format: PaperFormat::default(),
            orientation: Orientation::default(),
            scale: DEFAULT_SCALE,
            margin_mm: DEFAULT_MARGIN_MM,
            dpi: DpiOption::default(),
            bearing_deg: 0.0,
            cols: 1,
            rows: 1,
            overlap_mm: DEFAULT_OVERLAP_MM,
            grid: false,
            grid_interval: None,
            grid_zone: None,
            corner_sampling: CornerSampling::default(),
        }
    }
}

impl PrintRequest {
    pub fn builder() -> PrintRequestBuilder {
        PrintRequestBuilder::new()
    }

    pub fn is_multi_page(&self) -> bool {
        self.cols > 1 || self.rows > 1
    }

    /// Reads a request from JSON, filling in defaults for absent fields.
    pub fn from_json(json: &str) -> Result<Self, KortError> {
        serde_json::from_str(json).map_err(|e| KortError::IoError(e.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct PrintRequestBuilder {
    request: PrintRequest,
}

impl PrintRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(mut self, lng: f64, lat: f64) -> Self {
        self.request.center = GeoPoint::new(lng, lat);
        self
    }

    pub fn format(mut self, format: PaperFormat) -> Self {
        self.request.format = format;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.request.orientation = orientation;
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.request.scale = scale;
        self
    }

    pub fn margin_mm(mut self, margin_mm: f64) -> Self {
        self.request.margin_mm = margin_mm;
        self
    }

    pub fn dpi(mut self, dpi: DpiOption) -> Self {
        self.request.dpi = dpi;
        self
    }

    pub fn bearing(mut self, bearing_deg: f64) -> Self {
        self.request.bearing_deg = bearing_deg;
        self
    }

    pub fn pages(mut self, cols: u32, rows: u32) -> Self {
        self.request.cols = cols;
        self.request.rows = rows;
        self
    }

    pub fn overlap_mm(mut self, overlap_mm: f64) -> Self {
        self.request.overlap_mm = overlap_mm;
        self
    }

    pub fn grid(mut self, enabled: bool) -> Self {
        self.request.grid = enabled;
        self
    }

    pub fn grid_interval(mut self, interval: f64) -> Self {
        self.request.grid = true;
        self.request.grid_interval = Some(interval);
        self
    }

    pub fn grid_zone(mut self, zone: u8) -> Self {
        self.request.grid_zone = Some(zone);
        self
    }

    pub fn corner_sampling(mut self, corners: CornerSampling) -> Self {
        self.request.corner_sampling = corners;
        self
    }

    pub fn build(self) -> PrintRequest {
        self.request
    }
}

/// One sheet of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPage {
    /// Grid reference in a multi-page print, `None` for a single page
    pub label: Option<String>,
    pub row: u32,
    pub col: u32,
    pub bounds: PrintFrameBounds,
    pub file_name: String,
    pub footer: Footer,
    pub grid: Option<GridOverlay>,
    pub grid_lines: Vec<PageGridLine>,
    pub grid_labels: Vec<PageGridLabel>,
}

impl PlannedPage {
    /// Label used in logs and composition errors.
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or("1")
    }
}

/// A fully resolved print: shared page layout and decorations plus one
/// [`PlannedPage`] per sheet, north row first.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintPlan {
    pub request: PrintRequest,
    pub layout: PageLayout,
    pub scale_bar: ScaleBar,
    pub north_arrow: NorthArrow,
    pub pages: Vec<PlannedPage>,
    pub total_bounds: PrintFrameBounds,
}

/// Renders pages into a document. Implementations own the raster and file
/// format; the plan only supplies geometry in page millimetres.
pub trait PageComposer {
    fn begin_document(&mut self, plan: &PrintPlan) -> Result<(), KortError>;

    fn render_page(&mut self, plan: &PrintPlan, page: &PlannedPage) -> Result<(), KortError>;

    fn finish_document(&mut self, plan: &PrintPlan) -> Result<(), KortError>;
}

impl PrintPlan {
    pub fn new(request: &PrintRequest) -> Result<Self, KortError> {
        check_finite("bearing", request.bearing_deg)?;
        let layout = PageLayout::new(
            request.format,
            request.orientation,
            request.dpi,
            request.margin_mm,
        )?;
        let area = calculate_print_area(
            request.format,
            request.orientation,
            request.scale,
            request.margin_mm,
        )?;
        let scale_bar = ScaleBar::new(&layout, request.scale)?;
        let north_arrow = NorthArrow::new(&layout, request.bearing_deg);

        let center = request.center;
        let grid: MultiPageGridResult = tile_print_area(
            center.lng,
            center.lat,
            &area,
            request.scale,
            request.overlap_mm,
            request.cols,
            request.rows,
        )?;
        let multi = request.is_multi_page();
        // One zone for the whole print so grid lines line up across page seams
        let zone = match (request.grid, request.grid_zone) {
            (false, _) => None,
            (true, Some(zone)) => Some(zone),
            (true, None) => Some(utm_zone(center.lng)?),
        };

        let pages = grid
            .cells
            .par_iter()
            .map(|cell| plan_page(request, &layout, cell, multi, zone))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            pages = pages.len(),
            format = %request.format,
            scale = request.scale,
            grid = request.grid,
            "print plan ready"
        );

        Ok(Self {
            request: request.clone(),
            layout,
            scale_bar,
            north_arrow,
            pages,
            total_bounds: grid.total_bounds,
        })
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, label: &str) -> Option<&PlannedPage> {
        self.pages.iter().find(|p| p.label.as_deref() == Some(label))
    }

    /// The print frame as drawn on a map rotated by the request bearing.
    pub fn frame_polygon(&self) -> Polygon<f64> {
        print_frame_polygon(
            &self.request.center,
            &self.total_bounds,
            self.request.bearing_deg,
        )
    }

    /// Runs `composer` over the pages in order, stopping at the first error.
    pub fn compose<C: PageComposer>(&self, composer: &mut C) -> Result<(), KortError> {
        composer.begin_document(self)?;
        for page in &self.pages {
            debug!(page = page.name(), "composing page");
            composer
                .render_page(self, page)
                .map_err(|e| match e {
                    KortError::CompositionError { .. } => e,
                    other => KortError::CompositionError {
                        page: page.name().to_string(),
                        message: other.to_string(),
                    },
                })?;
        }
        composer.finish_document(self)
    }
}

fn plan_page(
    request: &PrintRequest,
    layout: &PageLayout,
    cell: &PageCell,
    multi: bool,
    zone: Option<u8>,
) -> Result<PlannedPage, KortError> {
    let label = multi.then(|| cell.label.clone());

    let grid = match zone {
        Some(zone) => {
            let mut builder = GridOverlay::builder()
                .bounds(&cell.bounds)
                .zone(zone)
                .scale(request.scale)
                .corner_sampling(request.corner_sampling);
            if let Some(interval) = request.grid_interval {
                builder = builder.interval(interval);
            }
            Some(builder.build()?)
        }
        None => None,
    };

    let (grid_lines, grid_labels) = match &grid {
        Some(overlay) => page_grid_lines(overlay, &cell.bounds, layout),
        None => (Vec::new(), Vec::new()),
    };

    Ok(PlannedPage {
        file_name: output_file_name(request.scale, request.format, label.as_deref()),
        footer: Footer::new(layout, request.scale, label.as_deref()),
        label,
        row: cell.row,
        col: cell.col,
        bounds: cell.bounds,
        grid,
        grid_lines,
        grid_labels,
    })
}

/// Bounds of a single-page print, as shown by the frame on the map.
pub fn single_page_bounds(request: &PrintRequest) -> Result<PrintFrameBounds, KortError> {
    let area = calculate_print_area(
        request.format,
        request.orientation,
        request.scale,
        request.margin_mm,
    )?;
    ground_extent_to_bounds(
        request.center.lng,
        request.center.lat,
        area.ground_width_m,
        area.ground_height_m,
    )
}
