use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, [`GeoPoint`] and `geo_types` points
/// and coords. For geographic input, x is longitude and y is latitude.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude or easting).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude or northing).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 { self.0 }
    fn y(&self) -> f64 { self.1 }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 { Point::x(*self) }
    fn y(&self) -> f64 { Point::y(*self) }
}

impl Coordinate for Coord<f64> {
    fn x(&self) -> f64 { self.x }
    fn y(&self) -> f64 { self.y }
}

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn from_coordinate(coord: &impl Coordinate) -> Self {
        Self::new(coord.x(), coord.y())
    }
}

impl Coordinate for GeoPoint {
    fn x(&self) -> f64 { self.lng }
    fn y(&self) -> f64 { self.lat }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.lng, y: p.lat }
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lng, p.lat)
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(c: Coord<f64>) -> Self {
        GeoPoint::new(c.x, c.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_trait_tuple() {
        let tuple = (10.4, 56.0);
        assert_eq!(tuple.x(), 10.4);
        assert_eq!(tuple.y(), 56.0);
    }

    #[test]
    fn test_coordinate_trait_point() {
        let point = Point::new(10.4, 56.0);
        assert_eq!(point.x(), 10.4);
        assert_eq!(point.y(), 56.0);
    }

    #[test]
    fn test_geopoint_conversions() {
        let p = GeoPoint::from_coordinate(&(12.57, 55.68));
        let c: Coord<f64> = p.into();
        assert_eq!(c.x, 12.57);
        assert_eq!(GeoPoint::from(c), p);
        assert_eq!(Point::from(p).y(), 55.68);
    }
}
