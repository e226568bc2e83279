/// Default page margin on every side, in millimetres
pub const DEFAULT_MARGIN_MM: f64 = 10.0;

/// Default overlap between neighbouring pages of a multi-page print, in millimetres
pub const DEFAULT_OVERLAP_MM: f64 = 10.0;

/// Default map scale denominator (1:25 000)
pub const DEFAULT_SCALE: f64 = 25000.0;

/// Scale denominators offered as presets
pub const SCALE_PRESETS: [f64; 6] = [10000.0, 25000.0, 50000.0, 100000.0, 250000.0, 500000.0];

/// Flat-earth conversion factor used for print bounds
pub const METERS_PER_DEGREE_LAT: f64 = 111320.0;

/// Latitudes at or beyond this magnitude are rejected
pub const MAX_OPERATING_LATITUDE: f64 = 85.0;

/// Mean Earth radius in metres (IUGG)
pub const EARTH_RADIUS: f64 = 6371008.8;

/// WGS84 semi-major axis in metres
pub const WGS84_A: f64 = 6378137.0;

/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257223563;

/// UTM central meridian scale factor
pub const UTM_K0: f64 = 0.9996;

/// UTM false easting in metres
pub const UTM_FALSE_EASTING: f64 = 500000.0;

/// UTM false northing for the southern hemisphere in metres
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10000000.0;

/// Zone used for Danish mapping (ETRS89 / UTM zone 32N, EPSG:25832)
pub const DENMARK_UTM_ZONE: u8 = 32;

/// Target scale bar length on paper, in millimetres
pub const SCALE_BAR_TARGET_MM: f64 = 40.0;

/// Candidate scale bar distances in metres
pub const NICE_DISTANCES: [f64; 16] = [
    1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0,
    20000.0, 50000.0, 100000.0,
];

/// Attribution printed at the bottom right of every page
pub const ATTRIBUTION: &str = "Kortdata: Klimadatastyrelsen | kort.mahoje.dk";

pub const MM_PER_INCH: f64 = 25.4;
pub const POINTS_PER_INCH: f64 = 72.0;

/// Default map centre over Denmark (lng, lat)
pub const DENMARK_CENTER: (f64, f64) = (10.4, 56.0);
pub const DEFAULT_ZOOM: f64 = 7.0;
