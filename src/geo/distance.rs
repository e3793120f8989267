//! Great-circle distance
//!
//! Haversine on a spherical Earth (R = 6,371 km). This is the ground truth
//! for how close two reports are; geohash prefixes only narrow candidates.

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::error::Result;
use crate::geo::Coordinates;

/// Calculate the distance between two points in meters (Haversine formula)
///
/// Callers must pass validated coordinates. For raw input use
/// [`calculate_distance`].
pub fn haversine_distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lng = (p2.lng - p1.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodes
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Distance in meters between two raw lat/lng pairs
///
/// # Errors
/// `InvalidCoordinates` if either point is out of range or NaN.
pub fn calculate_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64> {
    let p1 = Coordinates::checked(lat1, lng1)?;
    let p2 = Coordinates::checked(lat2, lng2)?;
    Ok(haversine_distance(p1, p2))
}
