#![deny(missing_docs)]
#![doc = "Initial-state preparation for mesoscopic devices: lead filling, charging-energy sector selection, scatterer ground states and their composition into one global state."]

/// Alternating product-state filling.
pub mod alternating;
/// Charging-energy optimisation.
pub mod charging;
/// Sector selection and state assembly.
pub mod composer;
/// YAML configuration.
pub mod config;
/// Fermi-sea filling.
pub mod filling;
/// Configuration-driven preparation.
pub mod pipeline;
/// Composition reports.
pub mod report;
/// Scatterer ground states.
pub mod scatterer;
/// Segment and global state types.
pub mod state;

pub use alternating::alternating_filling;
pub use charging::{
    best_sectors, candidate_charges, charging_energy, ChargeSectorEnergy, ChargingOptimum,
    ChargingParams,
};
pub use composer::{
    ChemicalPotentials, ComposeOptions, Composition, GroundStateComposer, ScattererModel,
};
pub use config::{
    CapacitanceConfig, InitialStateSpec, LeadConfig, LeadsConfig, PrepConfig, ScattererConfig,
    SpectrumSpec,
};
pub use filling::{fill, EnergyConvention, SegmentFilling};
pub use pipeline::{prepare, Preparation};
pub use report::{CompositionReport, OrbitalRow, ScattererSummary, SectorSummary};
pub use scatterer::{
    build_pairing_operator, non_interacting_sectors, pairing_coefficients, quasiparticle_sectors,
    PairingParams, PairingPolicy, ScattererGroundStateProvider, ScattererSectors, SectorState,
};
pub use state::{GlobalState, PositionState, SegmentState};
