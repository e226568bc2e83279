//! Shared precondition checks. Every public computation rejects bad input
//! through these instead of clamping.

use crate::core::constants::MAX_OPERATING_LATITUDE;
use crate::error::KortError;
use crate::util::coord::Coordinate;

pub(crate) fn check_scale(scale: f64) -> Result<(), KortError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(KortError::InvalidScale(scale));
    }
    Ok(())
}

pub(crate) fn check_latitude(lat: f64) -> Result<(), KortError> {
    if !lat.is_finite() || lat.abs() >= MAX_OPERATING_LATITUDE {
        return Err(KortError::LatitudeOutOfRange(lat));
    }
    Ok(())
}

pub(crate) fn check_finite(name: &str, value: f64) -> Result<(), KortError> {
    if !value.is_finite() {
        return Err(KortError::InvalidCoordinate(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Ok(())
}

pub(crate) fn check_extent(name: &str, value: f64) -> Result<(), KortError> {
    check_finite(name, value)?;
    if value < 0.0 {
        return Err(KortError::InvalidCoordinate(format!(
            "{} must not be negative, got {}",
            name, value
        )));
    }
    Ok(())
}

pub(crate) fn check_zone(zone: u8) -> Result<(), KortError> {
    if !(1..=60).contains(&zone) {
        return Err(KortError::InvalidZone(zone));
    }
    Ok(())
}

/// A lng/lat position on the globe: finite, with |lat| <= 90.
pub(crate) fn check_position(coord: &impl Coordinate) -> Result<(), KortError> {
    check_finite("longitude", coord.x())?;
    check_finite("latitude", coord.y())?;
    if coord.y().abs() > 90.0 {
        return Err(KortError::InvalidCoordinate(format!(
            "latitude must be within [-90, 90], got {}",
            coord.y()
        )));
    }
    Ok(())
}
