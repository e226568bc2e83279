//! # kortprint-rs
//!
//! Geometry behind printing topographic maps of Denmark: how much ground a
//! sheet of paper covers at a given scale, how a large print is tiled into
//! overlapping pages, where the UTM grid lines fall and how long or large a
//! drawn feature is.
//!
//! ### 1. Print frames and page grids
//!
//! ```
//! use kortprint_rs::{Orientation, PaperFormat, calculate_multi_page_grid, calculate_print_area};
//!
//! # fn main() -> Result<(), kortprint_rs::KortError> {
//! let area = calculate_print_area(PaperFormat::A4, Orientation::Portrait, 25000.0, 10.0)?;
//! assert_eq!(area.ground_width_m, 4750.0);
//!
//! let pages = calculate_multi_page_grid(
//!     10.2, 56.16, PaperFormat::A4, Orientation::Portrait, 25000.0, 10.0, 2, 2,
//! )?;
//! assert_eq!(pages.cells[3].label, "B2");
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. UTM coordinates and grid overlays
//!
//! ```
//! use kortprint_rs::{GridOverlay, ground_extent_to_bounds, latlng_to_utm};
//!
//! # fn main() -> Result<(), kortprint_rs::KortError> {
//! let utm = latlng_to_utm(55.6761, 12.5683, Some(32))?;
//! assert_eq!(utm.zone, 32);
//!
//! let bounds = ground_extent_to_bounds(12.5683, 55.6761, 4750.0, 6925.0)?;
//! let grid = GridOverlay::builder().bounds(&bounds).scale(25000.0).build()?;
//! let geojson = grid.to_feature_collection();
//! assert!(!geojson.features.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. Print plans
//!
//! A [`PrintRequest`] resolves into a [`PrintPlan`] holding everything a
//! [`PageComposer`] needs to draw each page: raster size, grid lines in page
//! millimetres, the scale bar, the north arrow and the footer.
//!
//! ```
//! use kortprint_rs::{PrintPlan, PrintRequest};
//!
//! # fn main() -> Result<(), kortprint_rs::KortError> {
//! let request = PrintRequest::builder().center(10.2, 56.16).pages(2, 1).grid(true).build();
//! let plan = PrintPlan::new(&request)?;
//! assert_eq!(plan.pages[1].file_name, "kort_125k_A4_A2.pdf");
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. Measurement
//!
//! ```
//! use kortprint_rs::measure_geometry_str;
//!
//! # fn main() -> Result<(), kortprint_rs::KortError> {
//! let m = measure_geometry_str("LINESTRING(12.5683 55.6761, 10.2039 56.1629)")?;
//! assert_eq!(m.distance, "156,9 km");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod core;
pub mod error;
pub mod geom;
pub mod io;
pub mod util;

pub use api::{
    BaseLayer, CornerSampling, Footer, GridAxis, GridLabel, GridLineFeature, GridOverlay,
    GridOverlayBuilder, LabelEdge, MAX_GRID_LINES, MapStyle, NorthArrow, PageComposer, PageGridLabel,
    PageGridLine, PageLayout, PageProjector, PlannedPage, PrintPlan, PrintRequest,
    PrintRequestBuilder, ScaleBar, ShareState, UtmExtent, mm_to_pt, mm_to_px, nice_number,
    output_file_name, page_grid_lines, single_page_bounds,
};
pub use core::{
    ATTRIBUTION, DEFAULT_MARGIN_MM, DEFAULT_OVERLAP_MM, DEFAULT_SCALE, DENMARK_CENTER,
    DENMARK_UTM_ZONE, DpiOption, EARTH_RADIUS, MAX_GRID_COLS, MAX_GRID_ROWS, MultiPageGridResult, Orientation,
    PageCell, PaperFormat, PrintArea, PrintFrameBounds, SCALE_PRESETS, UtmCoordinate,
    calculate_area, calculate_distance, calculate_multi_page_grid, calculate_print_area,
    central_meridian, format_area, format_distance, format_utm_coord, grid_interval,
    ground_extent_to_bounds, haversine_distance, latlng_to_utm, meters_per_degree_lng,
    page_label, print_frame_polygon, tile_print_area, utm_to_latlng, utm_to_latlng_south,
    utm_zone,
};
pub use error::KortError;
pub use geom::{Measurement, measure_geometry, measure_geometry_str, parse_geometry};
pub use io::{CsvMeasureConfig, MeasureCsv, csv_to_measured_csv, write_page_index_csv};
pub use util::{Coordinate, GeoPoint, format_danish};

pub use geo_types;
pub use geojson;

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::point;

    #[test]
    fn test_print_frame_workflow() -> Result<(), KortError> {
        let area = calculate_print_area(PaperFormat::A4, Orientation::Landscape, 50000.0, 10.0)?;
        assert_eq!(area.paper_width_mm, 277.0);
        assert_eq!(area.ground_width_m, 13850.0);

        let bounds = ground_extent_to_bounds(10.2039, 56.1629, area.ground_width_m, area.ground_height_m)?;
        let center = bounds.center();
        assert!((center.lng - 10.2039).abs() < 1e-12);
        assert!((center.lat - 56.1629).abs() < 1e-12);
        assert!(bounds.contains(&point! { x: 10.2039, y: 56.1629 }));
        Ok(())
    }

    #[test]
    fn test_grid_on_every_page_uses_denmark_zone() -> Result<(), KortError> {
        let pages = calculate_multi_page_grid(
            10.2039,
            56.1629,
            PaperFormat::A3,
            Orientation::Portrait,
            25000.0,
            10.0,
            2,
            2,
        )?;

        for cell in pages.iter() {
            let grid = GridOverlay::builder()
                .bounds(&cell.bounds)
                .zone(DENMARK_UTM_ZONE)
                .scale(25000.0)
                .build()?;
            assert_eq!(grid.interval(), 1000.0);
            assert!(grid.lines_along(GridAxis::Easting).count() >= 5);
            assert!(grid.lines_along(GridAxis::Northing).count() >= 5);
        }
        Ok(())
    }

    #[test]
    fn test_utm_round_trip_copenhagen() -> Result<(), KortError> {
        let utm = latlng_to_utm(55.6761, 12.5683, Some(DENMARK_UTM_ZONE))?;
        assert!((utm.easting - 724351.93).abs() < 0.01);
        assert!((utm.northing - 6175804.02).abs() < 0.01);
        assert_eq!(format_utm_coord(utm.easting), "724");

        let back = utm.to_latlng()?;
        assert!((back.lat - 55.6761).abs() < 1e-6);
        assert!((back.lng - 12.5683).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_shared_link_to_plan() -> Result<(), KortError> {
        let state = ShareState::from_query_string("c=55.67610%2C12.56830%2C12.0&s=10000&f=A5&o=l");
        let request = state.apply_to(&PrintRequest::default());
        let plan = PrintPlan::new(&request)?;

        assert_eq!(plan.layout.page_width_mm, 210.0);
        assert_eq!(plan.pages[0].file_name, "kort_110k_A5.pdf");
        assert_eq!(plan.pages[0].footer.scale_text, "1:10.000");
        Ok(())
    }

    #[test]
    fn test_measure_print_frame() -> Result<(), KortError> {
        let bounds = ground_extent_to_bounds(10.4, 56.0, 4750.0, 6925.0)?;
        let polygon = bounds.to_polygon();
        let m = measure_geometry(&geo_types::Geometry::Polygon(polygon))?;

        // Flat-earth frame against spherical measurement, within half a percent
        let expected_area = 4750.0 * 6925.0;
        assert!((m.area_m2 - expected_area).abs() / expected_area < 5e-3);
        assert!((m.distance_m - 2.0 * (4750.0 + 6925.0)).abs() < 100.0);
        Ok(())
    }
}
