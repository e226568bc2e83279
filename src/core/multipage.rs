use crate::core::constants::{DEFAULT_MARGIN_MM, METERS_PER_DEGREE_LAT};
use crate::core::paper::{Orientation, PaperFormat};
use crate::core::print_area::{
    PrintArea, PrintFrameBounds, calculate_print_area, ground_extent_to_bounds,
    meters_per_degree_lng,
};
use crate::core::validate::{check_finite, check_latitude, check_scale};
use crate::error::KortError;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Rows are labelled `A`..`Z`.
pub const MAX_GRID_ROWS: u32 = 26;

/// Columns are labelled `1`..`99`.
pub const MAX_GRID_COLS: u32 = 99;

/// One page of a multi-page print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCell {
    /// Row index, 0 is the northernmost row
    pub row: u32,
    /// Column index, 0 is the westernmost column
    pub col: u32,
    /// Grid reference such as `"A1"` or `"B3"`
    pub label: String,
    pub bounds: PrintFrameBounds,
}

/// All pages of a multi-page print plus the extent they cover together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPageGridResult {
    pub cells: Vec<PageCell>,
    pub total_bounds: PrintFrameBounds,
}

impl MultiPageGridResult {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageCell> {
        self.cells.iter()
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&PageCell> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.col == col)
    }

    pub fn get_by_label(&self, label: &str) -> Option<&PageCell> {
        self.cells.iter().find(|cell| cell.label == label)
    }
}

/// Grid reference for a page: row letter followed by the 1-based column.
///
/// ```
/// assert_eq!(kortprint_rs::page_label(1, 2), "B3");
/// ```
pub fn page_label(row: u32, col: u32) -> String {
    let letter = char::from(b'A' + (row % MAX_GRID_ROWS) as u8);
    format!("{}{}", letter, col + 1)
}

/// Splits a print into `cols` x `rows` pages centred on a point.
///
/// Neighbouring pages share exactly `overlap_mm` of paper (converted to ground
/// metres at `scale`) along each common edge. Row 0 is the top (north) row.
/// Pages use the default 10 mm margin; see [`tile_print_area`] for others.
///
/// Each cell's longitude span is computed at its own row's latitude, while
/// `total_bounds` uses the centre latitude. Outer columns of rows away from
/// the centre therefore stop slightly short of the total east/west edges:
/// about 0.08 % of the total width for 3x4 A3 pages at 1:50 000 around 55.5°N.
/// Interior seams stay covered as long as the overlap exceeds that shortfall.
#[allow(clippy::too_many_arguments)]
pub fn calculate_multi_page_grid(
    center_lng: f64,
    center_lat: f64,
    format: PaperFormat,
    orientation: Orientation,
    scale: f64,
    overlap_mm: f64,
    cols: u32,
    rows: u32,
) -> Result<MultiPageGridResult, KortError> {
    let area = calculate_print_area(format, orientation, scale, DEFAULT_MARGIN_MM)?;
    tile_print_area(center_lng, center_lat, &area, scale, overlap_mm, cols, rows)
}

/// Tiles pages of an already computed [`PrintArea`] around a point.
pub fn tile_print_area(
    center_lng: f64,
    center_lat: f64,
    area: &PrintArea,
    scale: f64,
    overlap_mm: f64,
    cols: u32,
    rows: u32,
) -> Result<MultiPageGridResult, KortError> {
    if cols == 0 || rows == 0 || cols > MAX_GRID_COLS || rows > MAX_GRID_ROWS {
        return Err(KortError::InvalidGridDimensions { cols, rows });
    }
    check_finite("longitude", center_lng)?;
    check_latitude(center_lat)?;
    check_scale(scale)?;

    let max_mm = area.paper_width_mm.min(area.paper_height_mm);
    if !overlap_mm.is_finite() || overlap_mm < 0.0 || overlap_mm >= max_mm {
        return Err(KortError::InvalidOverlap { overlap_mm, max_mm });
    }

    let page_ground_w = area.ground_width_m;
    let page_ground_h = area.ground_height_m;
    let overlap_m = overlap_mm * scale / 1000.0;

    let step_w = page_ground_w - overlap_m;
    let step_h = page_ground_h - overlap_m;

    let total_ground_w = page_ground_w + (cols - 1) as f64 * step_w;
    let total_ground_h = page_ground_h + (rows - 1) as f64 * step_h;

    let total_bounds =
        ground_extent_to_bounds(center_lng, center_lat, total_ground_w, total_ground_h)?;

    let m_per_deg_lng = meters_per_degree_lng(center_lat);

    let mut cells = Vec::with_capacity(cols as usize * rows as usize);
    for row in 0..rows {
        for col in 0..cols {
            // Cell centre measured from the top-left corner of the whole grid
            let cell_center_w = col as f64 * step_w + page_ground_w / 2.0;
            let cell_center_h = row as f64 * step_h + page_ground_h / 2.0;

            let d_lng = (cell_center_w - total_ground_w / 2.0) / m_per_deg_lng;
            // Rows grow southwards while latitude grows northwards
            let d_lat = -(cell_center_h - total_ground_h / 2.0) / METERS_PER_DEGREE_LAT;

            let bounds = ground_extent_to_bounds(
                center_lng + d_lng,
                center_lat + d_lat,
                page_ground_w,
                page_ground_h,
            )?;
            let label = page_label(row, col);
            trace!(%label, ?bounds, "page cell");

            cells.push(PageCell {
                row,
                col,
                label,
                bounds,
            });
        }
    }

    debug!(
        cols,
        rows,
        overlap_m,
        ?total_bounds,
        "multi-page grid calculated"
    );

    Ok(MultiPageGridResult {
        cells,
        total_bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4_2x2() -> Result<MultiPageGridResult, KortError> {
        calculate_multi_page_grid(
            10.4,
            56.0,
            PaperFormat::A4,
            Orientation::Portrait,
            25000.0,
            10.0,
            2,
            2,
        )
    }

    #[test]
    fn test_labels() {
        assert_eq!(page_label(0, 0), "A1");
        assert_eq!(page_label(1, 2), "B3");
        assert_eq!(page_label(25, 9), "Z10");
    }

    #[test]
    fn test_2x2_labels_and_order() -> Result<(), KortError> {
        let grid = a4_2x2()?;
        let labels: Vec<&str> = grid.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["A1", "A2", "B1", "B2"]);

        let a1 = grid.get_by_label("A1").ok_or(KortError::InvalidGridDimensions { cols: 2, rows: 2 })?;
        let b1 = grid.get(1, 0).ok_or(KortError::InvalidGridDimensions { cols: 2, rows: 2 })?;
        assert!(a1.bounds.north > b1.bounds.north);
        assert!(a1.bounds.south > b1.bounds.south);

        let a2 = grid.get(0, 1).ok_or(KortError::InvalidGridDimensions { cols: 2, rows: 2 })?;
        assert!(a2.bounds.east > a1.bounds.east);
        Ok(())
    }

    #[test]
    fn test_single_page_matches_print_frame() -> Result<(), KortError> {
        let grid = calculate_multi_page_grid(
            10.4,
            56.0,
            PaperFormat::A4,
            Orientation::Portrait,
            25000.0,
            10.0,
            1,
            1,
        )?;
        let frame = ground_extent_to_bounds(10.4, 56.0, 4750.0, 6925.0)?;
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.cells[0].bounds, frame);
        assert_eq!(grid.total_bounds, frame);
        Ok(())
    }

    #[test]
    fn test_cells_cover_total_bounds_up_to_edge_shortfall() -> Result<(), KortError> {
        let grid = calculate_multi_page_grid(
            9.5,
            55.5,
            PaperFormat::A3,
            Orientation::Landscape,
            50000.0,
            15.0,
            3,
            4,
        )?;
        let total = grid.total_bounds;
        // Outer columns may stop short of the east/west edges by this much
        let max_shortfall = 1e-3 * total.width_deg();

        for cell in grid.iter() {
            if cell.col == 0 {
                assert!(cell.bounds.west - total.west <= max_shortfall);
            }
            if cell.col == 2 {
                assert!(total.east - cell.bounds.east <= max_shortfall);
            }
        }

        let west = total.west + max_shortfall;
        let east = total.east - max_shortfall;
        let south = total.south + 1e-9;
        let north = total.north - 1e-9;
        let steps = 40;
        for i in 0..=steps {
            for j in 0..=steps {
                let lng = west + (east - west) * i as f64 / steps as f64;
                let lat = south + (north - south) * j as f64 / steps as f64;
                let covered = grid.iter().any(|c| {
                    let b = &c.bounds;
                    lng >= b.west && lng <= b.east && lat >= b.south && lat <= b.north
                });
                assert!(covered, "({}, {}) not on any page", lng, lat);
            }
        }
        Ok(())
    }

    #[test]
    fn test_rejects_oversized_grids() {
        let huge = calculate_multi_page_grid(
            10.4,
            56.0,
            PaperFormat::A4,
            Orientation::Portrait,
            25000.0,
            10.0,
            u32::MAX,
            MAX_GRID_ROWS,
        );
        assert!(matches!(
            huge,
            Err(KortError::InvalidGridDimensions { rows: 26, .. })
        ));
        assert!(calculate_multi_page_grid(
            10.4,
            56.0,
            PaperFormat::A4,
            Orientation::Portrait,
            25000.0,
            10.0,
            MAX_GRID_COLS + 1,
            1,
        )
        .is_err());
    }

    #[test]
    fn test_neighbour_overlap_matches_overlap_mm() -> Result<(), KortError> {
        let grid = a4_2x2()?;
        let overlap_m = 10.0 * 25000.0 / 1000.0;

        let a1 = &grid.cells[0];
        let a2 = &grid.cells[1];
        let b1 = &grid.cells[2];

        let vertical = a1.bounds.south - b1.bounds.north;
        let expected_vertical = -overlap_m / METERS_PER_DEGREE_LAT;
        assert!((vertical - expected_vertical).abs() < 1e-9);

        let horizontal = a1.bounds.east - a2.bounds.west;
        let expected_horizontal = overlap_m / meters_per_degree_lng(a1.bounds.center().lat);
        assert!((horizontal - expected_horizontal).abs() < 1e-4);
        Ok(())
    }

    #[test]
    fn test_single_row_horizontal_overlap_is_exact() -> Result<(), KortError> {
        let grid = calculate_multi_page_grid(
            11.0,
            55.0,
            PaperFormat::A5,
            Orientation::Portrait,
            10000.0,
            20.0,
            3,
            1,
        )?;
        let expected = 20.0 * 10000.0 / 1000.0 / meters_per_degree_lng(55.0);
        for pair in grid.cells.windows(2) {
            let overlap = pair[0].bounds.east - pair[1].bounds.west;
            assert!((overlap - expected).abs() < 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_dimensions() {
        let result = calculate_multi_page_grid(
            10.4,
            56.0,
            PaperFormat::A4,
            Orientation::Portrait,
            25000.0,
            10.0,
            0,
            2,
        );
        assert_eq!(
            result,
            Err(KortError::InvalidGridDimensions { cols: 0, rows: 2 })
        );

        let result = calculate_multi_page_grid(
            10.4,
            56.0,
            PaperFormat::A4,
            Orientation::Portrait,
            25000.0,
            10.0,
            1,
            27,
        );
        assert!(matches!(
            result,
            Err(KortError::InvalidGridDimensions { rows: 27, .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_overlap_and_scale() {
        let too_much = calculate_multi_page_grid(
            10.4,
            56.0,
            PaperFormat::A4,
            Orientation::Portrait,
            25000.0,
            190.0,
            2,
            2,
        );
        assert!(matches!(too_much, Err(KortError::InvalidOverlap { .. })));

        let negative = calculate_multi_page_grid(
            10.4,
            56.0,
            PaperFormat::A4,
            Orientation::Portrait,
            25000.0,
            -1.0,
            2,
            2,
        );
        assert!(matches!(negative, Err(KortError::InvalidOverlap { .. })));

        let bad_scale = calculate_multi_page_grid(
            10.4,
            56.0,
            PaperFormat::A4,
            Orientation::Portrait,
            -25000.0,
            10.0,
            2,
            2,
        );
        assert_eq!(bad_scale, Err(KortError::InvalidScale(-25000.0)));
    }
}
