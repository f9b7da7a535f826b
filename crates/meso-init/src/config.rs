//! YAML configuration of a preparation run.

use std::fs;
use std::path::Path;

use meso_basis::{uniform_chain, PartitionedBasisManager, PlacementSpec, SegmentBasis};
use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::SegmentId;
use meso_solve::SolverConfig;
use serde::{Deserialize, Serialize};

use crate::charging::ChargingParams;
use crate::composer::{ChemicalPotentials, ComposeOptions, ScattererModel};
use crate::filling::EnergyConvention;

fn config_error(code: &str, message: impl Into<String>) -> PrepError {
    PrepError::Config(ErrorInfo::new(code, message))
}

fn default_hopping() -> f64 {
    1.0
}

/// Source of a segment spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SpectrumSpec {
    /// Open uniform tight-binding chain, diagonalised on load.
    TightBinding {
        /// Number of lattice sites.
        length: usize,
        /// Hopping amplitude.
        #[serde(default = "default_hopping")]
        hopping: f64,
        /// On-site energy.
        #[serde(default)]
        onsite: f64,
    },
    /// Externally diagonalised spectrum.
    Explicit {
        /// Orbital energies in local order.
        energies: Vec<f64>,
        /// Optional real-space mode amplitudes, one vector per orbital.
        #[serde(default)]
        modes: Option<Vec<Vec<f64>>>,
    },
}

impl SpectrumSpec {
    /// Builds the basis of `segment`.
    pub fn build(&self, segment: SegmentId) -> Result<SegmentBasis, PrepError> {
        match self {
            SpectrumSpec::TightBinding {
                length,
                hopping,
                onsite,
            } => uniform_chain(segment, *length, *hopping, *onsite),
            SpectrumSpec::Explicit {
                energies,
                modes: Some(modes),
            } => SegmentBasis::with_modes(segment, energies.clone(), modes.clone()),
            SpectrumSpec::Explicit {
                energies,
                modes: None,
            } => SegmentBasis::new(segment, energies.clone()),
        }
    }
}

/// One lead: spectrum and chemical potential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadConfig {
    /// Lead spectrum.
    pub spectrum: SpectrumSpec,
    /// Chemical potential.
    #[serde(default)]
    pub mu: f64,
}

/// Both leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadsConfig {
    /// Left lead.
    pub left: LeadConfig,
    /// Right lead.
    pub right: LeadConfig,
}

/// Scatterer spectrum, potential and physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScattererConfig {
    /// Scatterer spectrum.
    pub spectrum: SpectrumSpec,
    /// Chemical potential.
    #[serde(default)]
    pub mu: f64,
    /// Scatterer model.
    #[serde(default)]
    pub model: ScattererModel,
}

/// Capacitance orbital.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CapacitanceConfig {
    /// Energy recorded for the capacitance orbital in the orbital table.
    #[serde(default)]
    pub energy: f64,
}

/// Kind of initial state to prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InitialStateSpec {
    /// Composed ground state with charging-energy sector selection.
    #[default]
    GroundState,
    /// Alternating product-state filling with a fixed particle count.
    Alternating {
        /// Number of fermions to place.
        particles: usize,
    },
}

/// Complete preparation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Lead spectra and potentials.
    pub leads: LeadsConfig,
    /// Scatterer spectrum, potential and model.
    pub scatterer: ScattererConfig,
    /// Capacitance orbital.
    #[serde(default)]
    pub capacitance: CapacitanceConfig,
    /// Charging model.
    #[serde(default)]
    pub charging: ChargingParams,
    /// Placement policy of the global ordering.
    #[serde(default)]
    pub placement: PlacementSpec,
    /// Solver settings.
    #[serde(default)]
    pub solver: SolverConfig,
    /// Energy bookkeeping of filled segments.
    #[serde(default)]
    pub energy_convention: EnergyConvention,
    /// Kind of initial state.
    #[serde(default)]
    pub initial_state: InitialStateSpec,
}

impl PrepConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, PrepError> {
        serde_yaml::from_str(text).map_err(|err| config_error("config-parse", err.to_string()))
    }

    /// Reads and parses a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PrepError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            PrepError::Config(
                ErrorInfo::new("config-read", err.to_string()).with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Serialises the configuration back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, PrepError> {
        serde_yaml::to_string(self).map_err(|err| config_error("config-serialize", err.to_string()))
    }

    /// Registers all four segments and finalises the global ordering.
    pub fn build_basis(&self) -> Result<PartitionedBasisManager, PrepError> {
        let mut manager = PartitionedBasisManager::new();
        manager.add_segment(self.leads.left.spectrum.build(SegmentId::LeftLead)?)?;
        manager.add_segment(self.leads.right.spectrum.build(SegmentId::RightLead)?)?;
        manager.add_segment(self.scatterer.spectrum.build(SegmentId::Scatterer)?)?;
        manager.add_segment(SegmentBasis::new(
            SegmentId::Capacitance,
            vec![self.capacitance.energy],
        )?)?;
        let policy = self.placement.build();
        manager.finalize_ordering(policy.as_ref())?;
        Ok(manager)
    }

    /// Composer options derived from the configuration.
    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            potentials: ChemicalPotentials {
                left: self.leads.left.mu,
                right: self.leads.right.mu,
                scatterer: self.scatterer.mu,
            },
            charging: self.charging,
            model: self.scatterer.model,
            convention: self.energy_convention,
            solver: self.solver.clone(),
        }
    }
}
