use crate::core::constants::EARTH_RADIUS;
use crate::core::validate::check_position;
use crate::error::KortError;
use crate::util::coord::Coordinate;
use crate::util::format::format_danish;

/// Great-circle distance between two lng/lat positions in metres (haversine).
pub fn haversine_distance(a: &impl Coordinate, b: &impl Coordinate) -> Result<f64, KortError> {
    check_position(a)?;
    check_position(b)?;

    let d_lat = (b.y() - a.y()).to_radians();
    let d_lng = (b.x() - a.x()).to_radians();
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();

    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lng = (d_lng / 2.0).sin();
    let h = sin_d_lat * sin_d_lat + lat1.cos() * lat2.cos() * sin_d_lng * sin_d_lng;

    Ok(2.0 * EARTH_RADIUS * h.sqrt().asin())
}

/// Total length of a polyline of lng/lat positions, in metres.
///
/// Zero or one position measures 0.
pub fn calculate_distance<C: Coordinate>(coords: &[C]) -> Result<f64, KortError> {
    coords.iter().try_for_each(check_position)?;
    coords
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

/// Area of a polygon ring of lng/lat positions in square metres.
///
/// Spherical excess approximation, fine for polygons up to national size.
/// The ring may be open or closed. Fewer than three positions measure 0.
pub fn calculate_area<C: Coordinate>(coords: &[C]) -> Result<f64, KortError> {
    coords.iter().try_for_each(check_position)?;
    let n = coords.len();
    if n < 3 {
        return Ok(0.0);
    }

    let total: f64 = (0..n)
        .map(|i| {
            let lam1 = coords[i].x().to_radians();
            let lam3 = coords[(i + 2) % n].x().to_radians();
            let phi2 = coords[(i + 1) % n].y().to_radians();
            (lam3 - lam1) * phi2.sin()
        })
        .sum();

    Ok((total * EARTH_RADIUS * EARTH_RADIUS / 2.0).abs())
}

/// Distance for display: `"500 m"`, `"1,5 km"`.
pub fn format_distance(meters: f64) -> String {
    // 999.6 m rounds to 1000 and reads as km
    if meters.round() < 1000.0 {
        return format!("{} m", format_danish(meters, 0));
    }
    format!("{} km", format_danish(meters / 1000.0, 1))
}

/// Area for display: `"5.000 m²"`, `"5,0 ha"`, `"2,3 km²"`.
pub fn format_area(sq_meters: f64) -> String {
    if sq_meters < 10_000.0 {
        return format!("{} m²", format_danish(sq_meters, 0));
    }
    if sq_meters < 1_000_000.0 {
        return format!("{} ha", format_danish(sq_meters / 10_000.0, 1));
    }
    format!("{} km²", format_danish(sq_meters / 1_000_000.0, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A square of `side_m` metres with its south-west corner at (lng, lat).
    fn square(lng: f64, lat: f64, side_m: f64) -> Vec<(f64, f64)> {
        let m_per_deg = EARTH_RADIUS * std::f64::consts::PI / 180.0;
        let d_lat = side_m / m_per_deg;
        let d_lng = side_m / (m_per_deg * lat.to_radians().cos());
        vec![
            (lng, lat),
            (lng + d_lng, lat),
            (lng + d_lng, lat + d_lat),
            (lng, lat + d_lat),
            (lng, lat),
        ]
    }

    #[test]
    fn test_degenerate_input_measures_zero() -> Result<(), KortError> {
        let empty: Vec<(f64, f64)> = vec![];
        assert_eq!(calculate_distance(&empty)?, 0.0);
        assert_eq!(calculate_distance(&[(10.0, 56.0)])?, 0.0);
        assert_eq!(calculate_area(&[(10.0, 56.0), (10.1, 56.0)])?, 0.0);
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_positions() {
        assert!(matches!(
            calculate_distance(&[(f64::NAN, 56.0), (10.0, 56.0)]),
            Err(KortError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            calculate_distance(&[(10.0, 95.0), (10.0, 56.0)]),
            Err(KortError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            calculate_area(&[(10.0, 56.0), (10.1, f64::INFINITY), (10.1, 56.1)]),
            Err(KortError::InvalidCoordinate(_))
        ));
        assert!(haversine_distance(&(10.0, -91.0), &(10.0, 56.0)).is_err());
    }

    #[test]
    fn test_square_perimeter() -> Result<(), KortError> {
        let ring = square(10.4, 56.0, 1000.0);
        let perimeter = calculate_distance(&ring)?;
        assert!((perimeter - 4000.0).abs() < 40.0, "perimeter {}", perimeter);
        Ok(())
    }

    #[test]
    fn test_square_area() -> Result<(), KortError> {
        let ring = square(10.4, 56.0, 1000.0);
        let area = calculate_area(&ring)?;
        assert!((area - 1_000_000.0).abs() < 10_000.0, "area {}", area);

        // Open and closed rings measure the same
        let open = &ring[..4];
        assert!((calculate_area(open)? - area).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_area_ignores_winding() -> Result<(), KortError> {
        let ring = square(12.0, 55.0, 500.0);
        let mut reversed = ring.clone();
        reversed.reverse();
        assert!((calculate_area(&ring)? - calculate_area(&reversed)?).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_copenhagen_to_aarhus() -> Result<(), KortError> {
        let d = haversine_distance(&(12.5683, 55.6761), &(10.2039, 56.1629))?;
        assert!((d - 156942.94).abs() < 0.1);
        assert_eq!(format_distance(d), "156,9 km");
        Ok(())
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(500.0), "500 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(999.5), "1,0 km");
        assert_eq!(format_distance(999.7), "1,0 km");
        assert_eq!(format_distance(1500.0), "1,5 km");
        assert_eq!(format_distance(12345.0), "12,3 km");
    }

    #[test]
    fn test_format_area() {
        assert_eq!(format_area(5000.0), "5.000 m²");
        assert_eq!(format_area(50000.0), "5,0 ha");
        assert_eq!(format_area(2_345_678.0), "2,3 km²");
        assert_eq!(format_area(12.4), "12 m²");
    }
}
