//! Geographic primitives
//!
//! This module handles:
//! - Coordinate validation
//! - Geohash encoding and cell geometry
//! - Great-circle distance

pub mod distance;
pub mod geohash;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(Error::InvalidCoordinates(format!(
                "({}, {}) is not a finite coordinate",
                self.lat, self.lng
            )));
        }
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Validated constructor
    pub fn checked(lat: f64, lng: f64) -> Result<Self> {
        let coords = Self::new(lat, lng);
        coords.validate()?;
        Ok(coords)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Axis-aligned lat/lng box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Parse `north,south,east,west`
    ///
    /// Returns None unless exactly four numbers are present.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .ok()?;

        match parts.as_slice() {
            [north, south, east, west] => Some(Self::new(*north, *south, *east, *west)),
            _ => None,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, coords: Coordinates) -> bool {
        coords.lat <= self.north
            && coords.lat >= self.south
            && coords.lng <= self.east
            && coords.lng >= self.west
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    /// Height in degrees of latitude
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Width in degrees of longitude
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }
}
