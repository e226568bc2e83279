pub mod parse;

pub use parse::{
    Measurement, measure_geometry, measure_geometry_str, parse_geojson, parse_geometry, parse_wkt,
};
