//! Geohash codec
//!
//! Encodes a coordinate into a base-32 string whose prefixes denote ever
//! smaller lat/lng cells. Reports are indexed by a precision-7 hash; nearby
//! searches scan a precision-5 prefix range.
//!
//! Bits alternate starting with longitude. Each bit halves the current
//! interval of its axis; a value on the midpoint goes to the upper half.

use crate::constants::geo::{GEOHASH_ALPHABET, MAX_PRECISION, RANGE_SENTINEL};
use crate::error::{Error, Result};
use crate::geo::{BoundingBox, Coordinates};

const BITS_PER_CHAR: usize = 5;

/// Encode a coordinate as a geohash of `precision` characters
///
/// # Arguments
/// * `lat` - Latitude in [-90, 90]
/// * `lng` - Longitude in [-180, 180]
/// * `precision` - Output length, 1 to 12
///
/// # Errors
/// `InvalidCoordinates` for out-of-range or NaN input, `InvalidPrecision`
/// for a precision outside 1..=12.
pub fn encode(lat: f64, lng: f64, precision: usize) -> Result<String> {
    check_precision(precision)?;
    Coordinates::checked(lat, lng)?;
    Ok(encode_unchecked(lat, lng, precision))
}

/// Encode already-validated coordinates
pub fn encode_coords(coords: Coordinates, precision: usize) -> Result<String> {
    encode(coords.lat, coords.lng, precision)
}

fn check_precision(precision: usize) -> Result<()> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(Error::InvalidPrecision(format!(
            "Precision {} is out of range [1, {}]",
            precision, MAX_PRECISION
        )));
    }
    Ok(())
}

fn encode_unchecked(lat: f64, lng: f64, precision: usize) -> String {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lng_range = (-180.0_f64, 180.0_f64);
    let mut hash = String::with_capacity(precision);

    let mut ch = 0usize;
    let mut bit = 0;
    let mut is_lng = true;

    while hash.len() < precision {
        let (value, range) = if is_lng {
            (lng, &mut lng_range)
        } else {
            (lat, &mut lat_range)
        };

        let mid = (range.0 + range.1) / 2.0;
        ch <<= 1;
        if value >= mid {
            ch |= 1;
            range.0 = mid;
        } else {
            range.1 = mid;
        }

        is_lng = !is_lng;
        bit += 1;

        if bit == BITS_PER_CHAR {
            hash.push(GEOHASH_ALPHABET[ch] as char);
            bit = 0;
            ch = 0;
        }
    }

    hash
}

fn char_index(c: char) -> Option<usize> {
    GEOHASH_ALPHABET.iter().position(|&b| b as char == c)
}

/// Decode a geohash into the cell it denotes
pub fn decode_bbox(hash: &str) -> Result<BoundingBox> {
    if hash.is_empty() || hash.len() > MAX_PRECISION {
        return Err(Error::InvalidGeohash(format!(
            "'{}' must have between 1 and {} characters",
            hash, MAX_PRECISION
        )));
    }

    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lng_range = (-180.0_f64, 180.0_f64);
    let mut is_lng = true;

    for c in hash.chars() {
        let idx = char_index(c).ok_or_else(|| {
            Error::InvalidGeohash(format!("'{}' contains invalid character '{}'", hash, c))
        })?;

        for shift in (0..BITS_PER_CHAR).rev() {
            let range = if is_lng {
                &mut lng_range
            } else {
                &mut lat_range
            };
            let mid = (range.0 + range.1) / 2.0;
            if (idx >> shift) & 1 == 1 {
                range.0 = mid;
            } else {
                range.1 = mid;
            }
            is_lng = !is_lng;
        }
    }

    Ok(BoundingBox::new(
        lat_range.1,
        lat_range.0,
        lng_range.1,
        lng_range.0,
    ))
}

/// Cell size in degrees `(lat, lng)` for a given precision
pub fn cell_size_degrees(precision: usize) -> (f64, f64) {
    let total_bits = precision * BITS_PER_CHAR;
    let lng_bits = total_bits.div_ceil(2);
    let lat_bits = total_bits / 2;
    (
        180.0 / 2f64.powi(lat_bits as i32),
        360.0 / 2f64.powi(lng_bits as i32),
    )
}

/// The adjacent cells of equal precision around `hash`
///
/// Cells past a pole are skipped; longitude wraps at the antimeridian.
pub fn neighbors(hash: &str) -> Result<Vec<String>> {
    let bbox = decode_bbox(hash)?;
    let center = bbox.center();
    let height = bbox.lat_span();
    let width = bbox.lng_span();

    let mut cells = Vec::with_capacity(8);
    for dlat in [-1.0, 0.0, 1.0] {
        for dlng in [-1.0, 0.0, 1.0] {
            if dlat == 0.0 && dlng == 0.0 {
                continue;
            }

            let lat = center.lat + dlat * height;
            if !(-90.0..=90.0).contains(&lat) {
                continue;
            }

            let mut lng = center.lng + dlng * width;
            if lng > 180.0 {
                lng -= 360.0;
            } else if lng < -180.0 {
                lng += 360.0;
            }

            let cell = encode_unchecked(lat, lng, hash.len());
            if cell != hash && !cells.contains(&cell) {
                cells.push(cell);
            }
        }
    }

    Ok(cells)
}

/// Half-open lexicographic range `[low, high)` covering every hash that
/// starts with `prefix`
pub fn prefix_range(prefix: &str) -> (String, String) {
    let mut high = String::with_capacity(prefix.len() + RANGE_SENTINEL.len_utf8());
    high.push_str(prefix);
    high.push(RANGE_SENTINEL);
    (prefix.to_string(), high)
}

/// Length of the common prefix of two hashes
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}
