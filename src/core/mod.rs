pub mod constants;
pub mod measure;
pub mod multipage;
pub mod paper;
pub mod print_area;
pub mod utm;
pub(crate) mod validate;

pub use constants::{
    ATTRIBUTION, DEFAULT_MARGIN_MM, DEFAULT_OVERLAP_MM, DEFAULT_SCALE, DENMARK_UTM_ZONE,
    DENMARK_CENTER, EARTH_RADIUS, SCALE_PRESETS,
};
pub use measure::{
    calculate_area, calculate_distance, format_area, format_distance, haversine_distance,
};
pub use multipage::{
    MAX_GRID_COLS, MAX_GRID_ROWS, MultiPageGridResult, PageCell, calculate_multi_page_grid, page_label,
    tile_print_area,
};
pub use paper::{DpiOption, Orientation, PaperFormat};
pub use print_area::{
    PrintArea, PrintFrameBounds, calculate_print_area, ground_extent_to_bounds,
    meters_per_degree_lng, print_frame_polygon,
};
pub use utm::{
    UtmCoordinate, central_meridian, format_utm_coord, grid_interval, latlng_to_utm, utm_to_latlng,
    utm_to_latlng_south, utm_zone,
};
