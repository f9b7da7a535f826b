use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use meso_basis::PartitionedBasisManager;
use meso_init::{prepare, CompositionReport, GlobalState, PrepConfig};
use tracing::info;

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// YAML configuration describing the device and the initial state.
    #[arg(long)]
    pub config: PathBuf,
    /// Output directory for report artefacts.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &PrepareArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let config = PrepConfig::load(&args.config)?;
    let prepared = prepare(&config)?;

    write_labels(&args.out.join("labels.csv"), &prepared.state)?;
    write_orbitals(&args.out.join("orbitals.csv"), &prepared.basis, &prepared.state)?;
    if let Some(report) = &prepared.report {
        write_report(&args.out.join("report.json"), report)?;
        info!(
            parity = %report.selected_parity,
            charge = report.selected_charge,
            hash = %report.report_hash,
            "composition written"
        );
    }
    fs::write(args.out.join("config.yaml"), config.to_yaml_string()?)?;
    Ok(())
}

fn write_report(path: &Path, report: &CompositionReport) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

fn write_labels(path: &Path, state: &GlobalState) -> Result<(), Box<dyn Error>> {
    let mut csv = fs::File::create(path)?;
    writeln!(csv, "position,state")?;
    for (idx, record) in state.positions().iter().enumerate() {
        writeln!(csv, "{},{}", idx + 1, record)?;
    }
    Ok(())
}

fn write_orbitals(
    path: &Path,
    basis: &PartitionedBasisManager,
    state: &GlobalState,
) -> Result<(), Box<dyn Error>> {
    let ordering = basis.ordering()?;
    let mut csv = fs::File::create(path)?;
    writeln!(csv, "position,segment,local_index,energy,state")?;
    for (position, segment, local) in ordering.iter() {
        let energy = basis.segment(segment)?.energy(local)?;
        writeln!(
            csv,
            "{},{},{},{:.9},{}",
            position,
            segment,
            local,
            energy,
            state.position_state(position)?
        )?;
    }
    Ok(())
}
