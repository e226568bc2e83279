use thiserror::Error;

/// Result type alias using [`KortError`].
pub type Result<T> = std::result::Result<T, KortError>;

/// Error type for kortprint-rs operations.
///
/// Precondition violations are always rejected with one of these variants,
/// never clamped to a "safe" value.
#[derive(Debug, Error, PartialEq)]
pub enum KortError {
    /// The map scale denominator is zero, negative or not finite.
    #[error("Invalid scale: {0} (must be a positive number)")]
    InvalidScale(f64),
    /// The margin leaves no printable area or is negative.
    #[error("Invalid margin: {margin_mm} mm (must be >= 0 and < {max_mm} mm)")]
    InvalidMargin { margin_mm: f64, max_mm: f64 },
    /// The page overlap is negative or swallows a whole page.
    #[error("Invalid overlap: {overlap_mm} mm (must be >= 0 and < {max_mm} mm)")]
    InvalidOverlap { overlap_mm: f64, max_mm: f64 },
    /// A multi-page grid needs at least one column and one row, and at most 26 rows.
    #[error("Invalid grid dimensions: {cols} cols x {rows} rows")]
    InvalidGridDimensions { cols: u32, rows: u32 },
    /// Latitude outside the supported operating range.
    #[error("Latitude out of range: {0} (|lat| must be < 85)")]
    LatitudeOutOfRange(f64),
    /// A coordinate or extent value is not usable (NaN, infinite or negative extent).
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    /// UTM zone outside 1-60.
    #[error("Invalid UTM zone: {0}")]
    InvalidZone(u8),
    /// Grid interval is zero, negative or not finite.
    #[error("Invalid grid interval: {0}")]
    InvalidInterval(f64),
    /// Raster resolution not among the supported options.
    #[error("Invalid DPI: {0} (expected 150, 200 or 300)")]
    InvalidDpi(u32),
    /// Paper format string not recognised.
    #[error("Unknown paper format: {0}")]
    UnknownPaperFormat(String),
    /// Orientation string not recognised.
    #[error("Unknown orientation: {0}")]
    UnknownOrientation(String),
    /// A builder was finished without a required value.
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParseError(String),
    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// File I/O or serialization error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Error reported by a page composer while assembling a document.
    #[error("Composition error on page {page}: {message}")]
    CompositionError { page: String, message: String },
}
