//! WGS84 / ETRS89 <-> UTM conversion.
//!
//! Danish maps use ETRS89 / UTM zone 32N (EPSG:25832); for this purpose
//! ETRS89 and WGS84 are treated as identical. The transforms use the classic
//! Snyder transverse Mercator series, which round-trips to well below a
//! millimetre within 3 degrees of the central meridian.

use crate::core::constants::{
    UTM_FALSE_EASTING, UTM_FALSE_NORTHING_SOUTH, UTM_K0, WGS84_A, WGS84_F,
};
use crate::core::validate::{check_finite, check_latitude, check_scale, check_zone};
use crate::error::KortError;
use crate::util::coord::GeoPoint;
use serde::{Deserialize, Serialize};

/// A projected UTM position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmCoordinate {
    pub easting: f64,
    /// Includes the 10 000 000 m false northing south of the equator
    pub northing: f64,
    pub zone: u8,
}

impl UtmCoordinate {
    /// Inverse projects a northern-hemisphere coordinate.
    pub fn to_latlng(&self) -> Result<GeoPoint, KortError> {
        utm_to_latlng(self.easting, self.northing, self.zone)
    }
}

/// First eccentricity squared.
fn e2() -> f64 {
    2.0 * WGS84_F - WGS84_F * WGS84_F
}

/// Second eccentricity squared.
fn ep2() -> f64 {
    let e2 = e2();
    e2 / (1.0 - e2)
}

/// Longitude of the central meridian of a zone.
pub fn central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// UTM zone containing a longitude.
///
/// Longitude 180 belongs to zone 60.
pub fn utm_zone(lng: f64) -> Result<u8, KortError> {
    check_finite("longitude", lng)?;
    if !(-180.0..=180.0).contains(&lng) {
        return Err(KortError::InvalidCoordinate(format!(
            "longitude must be within [-180, 180], got {}",
            lng
        )));
    }
    let zone = ((lng + 180.0) / 6.0).floor() as u8 + 1;
    Ok(zone.min(60))
}

/// Meridional arc length from the equator to `lat_rad`.
fn meridional_arc(lat_rad: f64) -> f64 {
    let e2 = e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat_rad
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat_rad).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat_rad).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat_rad).sin())
}

/// Converts a WGS84 position to UTM.
///
/// The zone is derived from the longitude unless `force_zone` is given, which
/// lets callers keep a whole map sheet in one zone (Bornholm is conventionally
/// drawn in zone 32 even though it lies in 33).
///
/// # Example
/// ```
/// use kortprint_rs::latlng_to_utm;
///
/// # fn main() -> Result<(), kortprint_rs::KortError> {
/// let utm = latlng_to_utm(55.6761, 12.5683, Some(32))?;
/// assert_eq!(utm.zone, 32);
/// assert!((utm.easting - 724351.93).abs() < 0.01);
/// # Ok(())
/// # }
/// ```
pub fn latlng_to_utm(lat: f64, lng: f64, force_zone: Option<u8>) -> Result<UtmCoordinate, KortError> {
    check_latitude(lat)?;
    let zone = match force_zone {
        Some(zone) => {
            check_zone(zone)?;
            check_finite("longitude", lng)?;
            zone
        }
        None => utm_zone(lng)?,
    };

    let e2 = e2();
    let ep2 = ep2();

    let lat_rad = lat.to_radians();
    let dlng_rad = (lng - central_meridian(zone)).to_radians();

    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let tan_lat = lat_rad.tan();

    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = ep2 * cos_lat * cos_lat;
    let a = cos_lat * dlng_rad;
    let m = meridional_arc(lat_rad);

    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;

    let easting = UTM_K0
        * n
        * (a + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
        + UTM_FALSE_EASTING;

    let mut northing = UTM_K0
        * (m + n
            * tan_lat
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

    if lat < 0.0 {
        northing += UTM_FALSE_NORTHING_SOUTH;
    }

    Ok(UtmCoordinate {
        easting,
        northing,
        zone,
    })
}

/// Converts a northern-hemisphere UTM position back to WGS84.
pub fn utm_to_latlng(easting: f64, northing: f64, zone: u8) -> Result<GeoPoint, KortError> {
    check_zone(zone)?;
    check_finite("easting", easting)?;
    check_finite("northing", northing)?;

    let e2 = e2();
    let ep2 = ep2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    let x = easting - UTM_FALSE_EASTING;
    let m = northing / UTM_K0;
    let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let sqrt_1_e2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    // Footpoint latitude
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let tan_phi1 = phi1.tan();

    let w = 1.0 - e2 * sin_phi1 * sin_phi1;
    let n1 = WGS84_A / w.sqrt();
    let t1 = tan_phi1 * tan_phi1;
    let c1 = ep2 * cos_phi1 * cos_phi1;
    let r1 = WGS84_A * (1.0 - e2) / w.powf(1.5);
    let d = x / (n1 * UTM_K0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let lat_rad = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let dlng_rad = (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5 / 120.0)
        / cos_phi1;

    Ok(GeoPoint::new(
        central_meridian(zone) + dlng_rad.to_degrees(),
        lat_rad.to_degrees(),
    ))
}

/// Converts a southern-hemisphere UTM position (with false northing) back to WGS84.
pub fn utm_to_latlng_south(easting: f64, northing: f64, zone: u8) -> Result<GeoPoint, KortError> {
    utm_to_latlng(easting, northing - UTM_FALSE_NORTHING_SOUTH, zone)
}

/// Grid line spacing in metres for a scale denominator.
///
/// Keeps the printed grid readable: about one line per 4 cm of paper or more.
pub fn grid_interval(scale: f64) -> Result<f64, KortError> {
    check_scale(scale)?;
    let interval = if scale <= 25000.0 {
        1000.0
    } else if scale <= 50000.0 {
        5000.0
    } else if scale <= 100000.0 {
        10000.0
    } else if scale <= 250000.0 {
        25000.0
    } else {
        50000.0
    };
    Ok(interval)
}

/// Easting/northing truncated to whole kilometres for display.
pub fn format_utm_coord(value: f64) -> String {
    ((value / 1000.0).floor() as i64).to_string()
}
