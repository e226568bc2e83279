use crate::core::measure::{calculate_area, calculate_distance, format_area, format_distance};
use crate::error::KortError;
use geo_types::{Geometry, LineString, Polygon};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wkt::Wkt;

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, KortError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a GeoJSON geometry or feature into a `geo_types::Geometry`.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, KortError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| KortError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => {
            Geometry::try_from(geom).map_err(|e| KortError::GeometryParseError(e.to_string()))
        }
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| KortError::GeometryParseError("Feature has no geometry".to_string()))
            .and_then(|g| {
                Geometry::try_from(g).map_err(|e| KortError::GeometryParseError(e.to_string()))
            }),
        GeoJson::FeatureCollection(_) => Err(KortError::GeometryParseError(
            "FeatureCollection not supported, measure features one at a time".to_string(),
        )),
    }
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, KortError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| KortError::GeometryParseError(e.to_string()))?;

    wkt.try_into()
        .map_err(|_| KortError::GeometryParseError("Failed to convert WKT to geometry".to_string()))
}

/// Geodesic size of a drawn or imported feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Length of lines, or perimeter of polygons
    pub distance_m: f64,
    /// Area of polygons with holes removed, 0 for other geometries
    pub area_m2: f64,
    pub distance: String,
    pub area: String,
}

impl Measurement {
    fn new(distance_m: f64, area_m2: f64) -> Self {
        Self {
            distance_m,
            area_m2,
            distance: format_distance(distance_m),
            area: format_area(area_m2),
        }
    }
}

fn ring_area(ring: &LineString<f64>) -> Result<f64, KortError> {
    calculate_area(&ring.0)
}

fn polygon_area(polygon: &Polygon<f64>) -> Result<f64, KortError> {
    let mut holes = 0.0;
    for ring in polygon.interiors() {
        holes += ring_area(ring)?;
    }
    Ok((ring_area(polygon.exterior())? - holes).max(0.0))
}

fn polygon_parts(polygon: &Polygon<f64>) -> Result<(f64, f64), KortError> {
    Ok((calculate_distance(&polygon.exterior().0)?, polygon_area(polygon)?))
}

fn sum_parts(
    mut parts: impl Iterator<Item = Result<(f64, f64), KortError>>,
) -> Result<(f64, f64), KortError> {
    parts.try_fold((0.0, 0.0), |(d, a), part| {
        let (pd, pa) = part?;
        Ok((d + pd, a + pa))
    })
}

fn measure_parts(geometry: &Geometry<f64>) -> Result<(f64, f64), KortError> {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => Ok((0.0, 0.0)),
        Geometry::Line(line) => Ok((calculate_distance(&[line.start, line.end])?, 0.0)),
        Geometry::LineString(ls) => Ok((calculate_distance(&ls.0)?, 0.0)),
        Geometry::MultiLineString(mls) => {
            sum_parts(mls.iter().map(|ls| Ok((calculate_distance(&ls.0)?, 0.0))))
        }
        Geometry::Polygon(p) => polygon_parts(p),
        Geometry::MultiPolygon(mp) => sum_parts(mp.iter().map(polygon_parts)),
        Geometry::Rect(r) => polygon_parts(&r.to_polygon()),
        Geometry::Triangle(t) => polygon_parts(&t.to_polygon()),
        Geometry::GeometryCollection(gc) => sum_parts(gc.iter().map(measure_parts)),
    }
}

/// Measures a lng/lat geometry. Points and degenerate shapes measure 0,
/// positions off the globe are rejected.
pub fn measure_geometry(geometry: &Geometry<f64>) -> Result<Measurement, KortError> {
    let (distance_m, area_m2) = measure_parts(geometry)?;
    Ok(Measurement::new(distance_m, area_m2))
}

/// Parses a WKT or GeoJSON string and measures it.
pub fn measure_geometry_str(s: &str) -> Result<Measurement, KortError> {
    measure_geometry(&parse_geometry(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geojson_point() -> Result<(), KortError> {
        let json = r#"{"type":"Point","coordinates":[12.5683,55.6761]}"#;
        let geom = parse_geometry(json)?;
        match geom {
            Geometry::Point(pt) => {
                assert!((pt.x() - 12.5683).abs() < 1e-9);
                assert!((pt.y() - 55.6761).abs() < 1e-9);
            }
            _ => panic!("Expected Point"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_geojson_feature() -> Result<(), KortError> {
        let json = r#"{"type":"Feature","properties":{"name":"rute"},"geometry":{"type":"LineString","coordinates":[[10.2,56.1],[10.3,56.2]]}}"#;
        match parse_geometry(json)? {
            Geometry::LineString(line) => assert_eq!(line.0.len(), 2),
            _ => panic!("Expected LineString"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_rejects_collections_and_garbage() {
        let fc = r#"{"type":"FeatureCollection","features":[]}"#;
        assert!(matches!(
            parse_geometry(fc),
            Err(KortError::GeometryParseError(_))
        ));
        assert!(matches!(
            parse_geometry("POLYGON((1 2, 3"),
            Err(KortError::GeometryParseError(_))
        ));
    }

    #[test]
    fn test_parse_wkt_polygon() -> Result<(), KortError> {
        let wkt = "POLYGON((10 56, 10.01 56, 10.01 56.01, 10 56.01, 10 56))";
        match parse_geometry(wkt)? {
            Geometry::Polygon(p) => assert_eq!(p.exterior().0.len(), 5),
            _ => panic!("Expected Polygon"),
        }
        Ok(())
    }

    #[test]
    fn test_measure_line() -> Result<(), KortError> {
        let m = measure_geometry_str("LINESTRING(12.5683 55.6761, 10.2039 56.1629)")?;
        assert!((m.distance_m - 156942.94).abs() < 0.1);
        assert_eq!(m.area_m2, 0.0);
        assert_eq!(m.distance, "156,9 km");
        assert_eq!(m.area, "0 m²");
        Ok(())
    }

    #[test]
    fn test_measure_polygon_with_hole() -> Result<(), KortError> {
        let outer = "(10 56, 10.02 56, 10.02 56.02, 10 56.02, 10 56)";
        let hole = "(10.005 56.005, 10.015 56.005, 10.015 56.015, 10.005 56.015, 10.005 56.005)";

        let solid = measure_geometry_str(&format!("POLYGON({})", outer))?;
        let holed = measure_geometry_str(&format!("POLYGON({}, {})", outer, hole))?;

        assert!(solid.area_m2 > 0.0);
        // The hole is a quarter of the outer ring
        let ratio = holed.area_m2 / solid.area_m2;
        assert!((ratio - 0.75).abs() < 1e-3, "ratio {}", ratio);
        assert_eq!(solid.distance_m, holed.distance_m);
        Ok(())
    }

    #[test]
    fn test_measure_rejects_positions_off_the_globe() {
        assert!(matches!(
            measure_geometry_str("LINESTRING(10 95, 10 56)"),
            Err(KortError::InvalidCoordinate(_))
        ));
        let json = r#"{"type":"Polygon","coordinates":[[[10,56],[10.1,56],[10.1,91],[10,56]]]}"#;
        assert!(matches!(
            measure_geometry_str(json),
            Err(KortError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_measure_point_is_zero() -> Result<(), KortError> {
        let m = measure_geometry_str("POINT(10 56)")?;
        assert_eq!(m.distance_m, 0.0);
        assert_eq!(m.area_m2, 0.0);
        assert_eq!(m.distance, "0 m");
        Ok(())
    }
}
