//! Distance command handler

use crate::error::Result;
use crate::geo::distance::calculate_distance;
use clap::Args;

/// Distance command arguments
#[derive(Args)]
pub struct DistanceArgs {
    #[arg(allow_negative_numbers = true)]
    pub lat1: f64,
    #[arg(allow_negative_numbers = true)]
    pub lng1: f64,
    #[arg(allow_negative_numbers = true)]
    pub lat2: f64,
    #[arg(allow_negative_numbers = true)]
    pub lng2: f64,
}

/// Run the distance command
pub fn run(args: DistanceArgs) -> Result<()> {
    let meters = calculate_distance(args.lat1, args.lng1, args.lat2, args.lng2)?;
    if meters >= 1000.0 {
        println!("{:.3} km", meters / 1000.0);
    } else {
        println!("{:.2} m", meters);
    }
    Ok(())
}
