use crate::core::constants::METERS_PER_DEGREE_LAT;
use crate::core::paper::{Orientation, PaperFormat};
use crate::core::validate::{check_extent, check_finite, check_latitude, check_scale};
use crate::error::KortError;
use crate::util::coord::{Coordinate, GeoPoint};
use geo_types::{Coord, LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Printable paper size and the ground it covers at a given scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintArea {
    /// Printable width in millimetres (margins already subtracted)
    pub paper_width_mm: f64,
    /// Printable height in millimetres (margins already subtracted)
    pub paper_height_mm: f64,
    pub ground_width_m: f64,
    pub ground_height_m: f64,
}

/// Axis-aligned geographic bounding box in degrees.
///
/// Boxes crossing the antimeridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintFrameBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl PrintFrameBounds {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.east + self.west) / 2.0, (self.north + self.south) / 2.0)
    }

    pub fn width_deg(&self) -> f64 {
        self.east - self.west
    }

    pub fn height_deg(&self) -> f64 {
        self.north - self.south
    }

    /// Inclusive containment test.
    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        coord.x() >= self.west
            && coord.x() <= self.east
            && coord.y() >= self.south
            && coord.y() <= self.north
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &PrintFrameBounds) -> PrintFrameBounds {
        PrintFrameBounds {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
        }
    }

    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.west, self.south)
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.east, self.north)
    }

    /// Corners in ring order: SW, SE, NE, NW.
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            GeoPoint::new(self.west, self.south),
            GeoPoint::new(self.east, self.south),
            GeoPoint::new(self.east, self.north),
            GeoPoint::new(self.west, self.north),
        ]
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.west, y: self.south },
            Coord { x: self.east, y: self.north },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}

/// Calculates the printable paper area and the ground extent it covers.
///
/// `scale` is the scale denominator (25000 for 1:25 000). The margin is
/// subtracted on every side and must leave a positive printable area.
///
/// # Example
/// ```
/// use kortprint_rs::{calculate_print_area, Orientation, PaperFormat};
///
/// # fn main() -> Result<(), kortprint_rs::KortError> {
/// let area = calculate_print_area(PaperFormat::A4, Orientation::Portrait, 25000.0, 10.0)?;
/// assert_eq!(area.paper_width_mm, 190.0);
/// assert_eq!(area.ground_height_m, 6925.0);
/// # Ok(())
/// # }
/// ```
pub fn calculate_print_area(
    format: PaperFormat,
    orientation: Orientation,
    scale: f64,
    margin_mm: f64,
) -> Result<PrintArea, KortError> {
    check_scale(scale)?;

    let (paper_width_mm, paper_height_mm) = format.oriented_mm(orientation);
    let max_mm = paper_width_mm.min(paper_height_mm) / 2.0;
    if !margin_mm.is_finite() || margin_mm < 0.0 || margin_mm >= max_mm {
        return Err(KortError::InvalidMargin { margin_mm, max_mm });
    }

    let printable_width_mm = paper_width_mm - 2.0 * margin_mm;
    let printable_height_mm = paper_height_mm - 2.0 * margin_mm;

    // mm on paper * scale = mm on ground
    let ground_width_m = printable_width_mm * scale / 1000.0;
    let ground_height_m = printable_height_mm * scale / 1000.0;

    Ok(PrintArea {
        paper_width_mm: printable_width_mm,
        paper_height_mm: printable_height_mm,
        ground_width_m,
        ground_height_m,
    })
}

/// Metres per degree of longitude at `lat`, flat-earth approximation.
pub fn meters_per_degree_lng(lat: f64) -> f64 {
    METERS_PER_DEGREE_LAT * lat.to_radians().cos()
}

/// Converts a ground extent centred on a point into lat/lng bounds.
///
/// Uses a local flat-earth approximation (111320 m per degree of latitude,
/// scaled by `cos(lat)` for longitude), which is accurate enough at national
/// scale and keeps the frame identical to what the map view shows.
pub fn ground_extent_to_bounds(
    lng: f64,
    lat: f64,
    width_m: f64,
    height_m: f64,
) -> Result<PrintFrameBounds, KortError> {
    check_finite("longitude", lng)?;
    check_latitude(lat)?;
    check_extent("width", width_m)?;
    check_extent("height", height_m)?;

    let half_width_deg = width_m / 2.0 / meters_per_degree_lng(lat);
    let half_height_deg = height_m / 2.0 / METERS_PER_DEGREE_LAT;

    let bounds = PrintFrameBounds {
        north: lat + half_height_deg,
        south: lat - half_height_deg,
        east: lng + half_width_deg,
        west: lng - half_width_deg,
    };
    debug!(?bounds, width_m, height_m, "ground extent converted to bounds");
    Ok(bounds)
}

/// Outline of the print frame as seen on a map rotated by `bearing_deg`.
///
/// Corners are rotated around `center` by `-bearing_deg` in degree space, so a
/// map turned clockwise shows the frame turned back counter-clockwise.
pub fn print_frame_polygon(
    center: &impl Coordinate,
    bounds: &PrintFrameBounds,
    bearing_deg: f64,
) -> Polygon<f64> {
    let (sin, cos) = (-bearing_deg).to_radians().sin_cos();
    let (cx, cy) = (center.x(), center.y());

    let mut ring: Vec<Coord<f64>> = bounds
        .corners()
        .iter()
        .map(|corner| {
            if bearing_deg == 0.0 {
                return Coord::from(*corner);
            }
            let dx = corner.lng - cx;
            let dy = corner.lat - cy;
            Coord {
                x: cx + dx * cos - dy * sin,
                y: cy + dx * sin + dy * cos,
            }
        })
        .collect();
    ring.push(ring[0]);

    Polygon::new(LineString::from(ring), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::DEFAULT_MARGIN_MM;

    #[test]
    fn test_a4_portrait_at_25000() -> Result<(), KortError> {
        let area = calculate_print_area(PaperFormat::A4, Orientation::Portrait, 25000.0, 10.0)?;
        assert_eq!(area.paper_width_mm, 190.0);
        assert_eq!(area.paper_height_mm, 277.0);
        assert_eq!(area.ground_width_m, 4750.0);
        assert_eq!(area.ground_height_m, 6925.0);
        Ok(())
    }

    #[test]
    fn test_landscape_swaps() -> Result<(), KortError> {
        let area = calculate_print_area(PaperFormat::A4, Orientation::Landscape, 25000.0, 10.0)?;
        assert_eq!(area.paper_width_mm, 277.0);
        assert_eq!(area.paper_height_mm, 190.0);
        assert_eq!(area.ground_width_m, 6925.0);
        assert_eq!(area.ground_height_m, 4750.0);
        Ok(())
    }

    #[test]
    fn test_a3_portrait_at_50000() -> Result<(), KortError> {
        let area = calculate_print_area(PaperFormat::A3, Orientation::Portrait, 50000.0, 10.0)?;
        assert_eq!(area.paper_width_mm, 277.0);
        assert_eq!(area.paper_height_mm, 400.0);
        assert_eq!(area.ground_width_m, 13850.0);
        assert_eq!(area.ground_height_m, 20000.0);
        Ok(())
    }

    #[test]
    fn test_custom_margin() -> Result<(), KortError> {
        let area = calculate_print_area(PaperFormat::A4, Orientation::Portrait, 25000.0, 15.0)?;
        assert_eq!(area.paper_width_mm, 180.0);
        assert_eq!(area.paper_height_mm, 267.0);
        Ok(())
    }

    #[test]
    fn test_landscape_is_portrait_transposed_for_all_formats() -> Result<(), KortError> {
        for format in PaperFormat::ALL {
            for scale in [10000.0, 25000.0, 50000.0, 100000.0, 250000.0, 500000.0] {
                let p = calculate_print_area(format, Orientation::Portrait, scale, DEFAULT_MARGIN_MM)?;
                let l = calculate_print_area(format, Orientation::Landscape, scale, DEFAULT_MARGIN_MM)?;
                assert_eq!(p.paper_width_mm, l.paper_height_mm);
                assert_eq!(p.paper_height_mm, l.paper_width_mm);
                assert_eq!(p.ground_width_m, l.ground_height_m);
                assert_eq!(p.ground_height_m, l.ground_width_m);
            }
        }
        Ok(())
    }

    #[test]
    fn test_ground_extent_scales_linearly() -> Result<(), KortError> {
        for format in PaperFormat::ALL {
            let single = calculate_print_area(format, Orientation::Portrait, 20000.0, 10.0)?;
            let double = calculate_print_area(format, Orientation::Portrait, 40000.0, 10.0)?;
            assert!((double.ground_width_m - 2.0 * single.ground_width_m).abs() < 1e-9);
            assert!((double.ground_height_m - 2.0 * single.ground_height_m).abs() < 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_rejects_bad_scale_and_margin() {
        assert_eq!(
            calculate_print_area(PaperFormat::A4, Orientation::Portrait, 0.0, 10.0),
            Err(KortError::InvalidScale(0.0))
        );
        assert!(matches!(
            calculate_print_area(PaperFormat::A4, Orientation::Portrait, 25000.0, 105.0),
            Err(KortError::InvalidMargin { max_mm, .. }) if max_mm == 105.0
        ));
        assert!(matches!(
            calculate_print_area(PaperFormat::A5, Orientation::Landscape, 25000.0, -1.0),
            Err(KortError::InvalidMargin { .. })
        ));
    }

    #[test]
    fn test_bounds_symmetric_around_center() -> Result<(), KortError> {
        let bounds = ground_extent_to_bounds(10.4, 56.0, 4750.0, 6925.0)?;
        let center = bounds.center();
        assert!((center.lat - 56.0).abs() < 1e-4);
        assert!((center.lng - 10.4).abs() < 1e-4);
        Ok(())
    }

    #[test]
    fn test_bounds_center_across_latitudes() -> Result<(), KortError> {
        let mut lat = 54.0;
        while lat <= 59.0 {
            let bounds = ground_extent_to_bounds(11.0, lat, 13850.0, 20000.0)?;
            let center = bounds.center();
            assert!((center.lat - lat).abs() < 1e-4);
            assert!((center.lng - 11.0).abs() < 1e-4);
            assert!(bounds.north > bounds.south);
            assert!(bounds.east > bounds.west);
            lat += 0.25;
        }
        Ok(())
    }

    #[test]
    fn test_bounds_size() -> Result<(), KortError> {
        let bounds = ground_extent_to_bounds(10.4, 56.0, 4750.0, 6925.0)?;
        assert!((bounds.height_deg() - 6925.0 / 111320.0).abs() < 1e-9);
        let cos_lat = 56.0_f64.to_radians().cos();
        assert!((bounds.width_deg() - 4750.0 / (111320.0 * cos_lat)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_bounds_reject_polar_latitude() {
        assert_eq!(
            ground_extent_to_bounds(10.0, 89.9, 1000.0, 1000.0),
            Err(KortError::LatitudeOutOfRange(89.9))
        );
        assert!(ground_extent_to_bounds(f64::NAN, 56.0, 1000.0, 1000.0).is_err());
        assert!(ground_extent_to_bounds(10.0, 56.0, -1.0, 1000.0).is_err());
    }

    #[test]
    fn test_bounds_helpers() -> Result<(), KortError> {
        let a = ground_extent_to_bounds(10.0, 56.0, 1000.0, 1000.0)?;
        let b = ground_extent_to_bounds(10.1, 56.1, 1000.0, 1000.0)?;
        let u = a.union(&b);
        assert_eq!(u.south, a.south);
        assert_eq!(u.north, b.north);
        assert!(u.contains(&(10.05, 56.05)));
        assert!(!a.contains(&(10.1, 56.1)));
        assert_eq!(a.to_polygon().exterior().coords().count(), 5);
        Ok(())
    }

    #[test]
    fn test_frame_polygon_without_bearing_matches_bounds() -> Result<(), KortError> {
        let bounds = ground_extent_to_bounds(10.4, 56.0, 4750.0, 6925.0)?;
        let polygon = print_frame_polygon(&(10.4, 56.0), &bounds, 0.0);
        let coords: Vec<_> = polygon.exterior().coords().copied().collect();
        assert_eq!(coords.len(), 5);
        assert_eq!(coords[0], Coord { x: bounds.west, y: bounds.south });
        assert_eq!(coords[2], Coord { x: bounds.east, y: bounds.north });
        Ok(())
    }

    #[test]
    fn test_frame_polygon_rotation() -> Result<(), KortError> {
        let bounds = ground_extent_to_bounds(10.0, 56.0, 2000.0, 2000.0)?;
        let polygon = print_frame_polygon(&(10.0, 56.0), &bounds, 90.0);
        // Rotating by -90 degrees sends the SW offset (dx, dy) to (dy, -dx).
        let sw = polygon.exterior().0[0];
        let dx = bounds.west - 10.0;
        let dy = bounds.south - 56.0;
        assert!((sw.x - (10.0 + dy)).abs() < 1e-12);
        assert!((sw.y - (56.0 - dx)).abs() < 1e-12);
        Ok(())
    }
}
