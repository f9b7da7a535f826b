use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use meso_init::PrepConfig;

#[derive(Args, Debug)]
pub struct OrderingArgs {
    /// YAML configuration describing the device.
    #[arg(long)]
    pub config: PathBuf,
}

pub fn run(args: &OrderingArgs) -> Result<(), Box<dyn Error>> {
    let config = PrepConfig::load(&args.config)?;
    let basis = config.build_basis()?;
    let ordering = basis.ordering()?;
    println!("# policy: {}", ordering.policy());
    println!("position,segment,local_index,energy");
    for orbital in basis.orbital_table()? {
        let position = basis.to_global(orbital.segment, orbital.local_index)?;
        println!(
            "{},{},{},{:.9}",
            position, orbital.segment, orbital.local_index, orbital.energy
        );
    }
    Ok(())
}
