use std::error::Error;

use clap::Args;
use meso_init::best_sectors;
use serde_json::json;

#[derive(Args, Debug)]
pub struct ChargingArgs {
    /// Largest charge magnitude searched.
    #[arg(long, default_value_t = 2)]
    pub max_occupancy: i64,
    /// Charging energy scale.
    #[arg(long)]
    pub ec: f64,
    /// Gate offset charge.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub ng: f64,
}

pub fn run(args: &ChargingArgs) -> Result<(), Box<dyn Error>> {
    let optimum = best_sectors(args.max_occupancy, args.ec, args.ng)?;
    let (even_energy, odd_energy, n_even, n_odd) = optimum.as_tuple();
    let body = json!({
        "even_energy": even_energy,
        "odd_energy": odd_energy,
        "n_even": n_even,
        "n_odd": n_odd,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
