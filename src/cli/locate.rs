//! Locate command handler

use crate::cli::print_json;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::services::Services;
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Explicit latitude (takes precedence)
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Explicit longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Address to geocode
    #[arg(long)]
    pub address: Option<String>,

    /// Public IP to look up (defaults to the caller's own)
    #[arg(long)]
    pub ip: Option<String>,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;
    let services = Services::from_config(&config)?;

    let coords = args.lat.zip(args.lng).map(|(lat, lng)| Coordinates::new(lat, lng));
    let location = services
        .resolver
        .resolve(coords, args.address.as_deref(), args.ip.as_deref())
        .await
        .ok_or_else(|| Error::Location("Could not determine location from IP or address".to_string()))?;

    print_json(&location)
}
