//! Geohash command handler

use crate::constants::geo::INDEX_PRECISION;
use crate::error::Result;
use crate::geo::geohash;
use clap::Args;

/// Geohash command arguments
#[derive(Args)]
pub struct GeohashArgs {
    /// Latitude in degrees
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(allow_negative_numbers = true)]
    pub lng: f64,

    /// Number of characters (1-12)
    #[arg(long, short = 'p', default_value_t = INDEX_PRECISION)]
    pub precision: usize,

    /// Also print the cell bounds and the 8 neighbouring cells
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Run the geohash command
pub fn run(args: GeohashArgs) -> Result<()> {
    let hash = geohash::encode(args.lat, args.lng, args.precision)?;
    println!("{}", hash);

    if args.verbose {
        let bbox = geohash::decode_bbox(&hash)?;
        println!(
            "bounds: N {:.6} S {:.6} E {:.6} W {:.6}",
            bbox.north, bbox.south, bbox.east, bbox.west
        );
        println!("neighbors: {}", geohash::neighbors(&hash)?.join(" "));
    }
    Ok(())
}
