//! Serializable summary of a composition.

use meso_core::{round_f64, stable_hash_string, Parity, PrepError, SegmentId};
use serde::{Deserialize, Serialize};

use crate::charging::{ChargeSectorEnergy, ChargingOptimum};
use crate::filling::EnergyConvention;
use crate::scatterer::SectorState;

/// Energy and particle number of one scatterer sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
    /// Sector parity.
    pub parity: Parity,
    /// Sector ground-state energy.
    pub energy: f64,
    /// Expected particle number.
    pub particle_number: f64,
    /// Whether the sector state is entangled.
    pub entangled: bool,
}

impl From<&SectorState> for SectorSummary {
    fn from(sector: &SectorState) -> Self {
        Self {
            parity: sector.parity,
            energy: sector.energy,
            particle_number: sector.particle_number,
            entangled: sector.state.is_entangled(),
        }
    }
}

/// Both scatterer sectors and their splitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScattererSummary {
    /// Even sector.
    pub even: SectorSummary,
    /// Odd sector.
    pub odd: SectorSummary,
    /// `odd.energy - even.energy`.
    pub gap: f64,
}

impl ScattererSummary {
    /// Summarises a pair of sectors.
    pub fn new(even: SectorSummary, odd: SectorSummary) -> Self {
        Self {
            even,
            odd,
            gap: odd.energy - even.energy,
        }
    }
}

/// One line of the orbital table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalRow {
    /// One-based global position.
    pub position: usize,
    /// Owning segment.
    pub segment: SegmentId,
    /// One-based index within the segment.
    pub local_index: usize,
    /// Orbital energy.
    pub energy: f64,
    /// `Occ`, `Emp`, an integer charge, or `*` inside an entangled block.
    pub state: String,
}

/// Deterministic record of a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionReport {
    /// Placement policy of the ordering.
    pub policy: String,
    /// Selected parity sector.
    pub selected_parity: Parity,
    /// Charge placed on the capacitance site.
    pub selected_charge: i64,
    /// Best even and odd charging energies.
    pub charging: ChargingOptimum,
    /// Summed lead energy.
    pub lead_energy: f64,
    /// Number of lead particles.
    pub lead_particles: usize,
    /// Scatterer sectors.
    pub scatterer: ScattererSummary,
    /// Charging plus scatterer energy of the even sector.
    pub total_even: f64,
    /// Charging plus scatterer energy of the odd sector.
    pub total_odd: f64,
    /// Expected fermion number of the composed state.
    pub particle_number: f64,
    /// Energy convention used for the leads.
    pub convention: EnergyConvention,
    /// Orbital table in global order.
    pub orbitals: Vec<OrbitalRow>,
    /// Hash over every other field.
    pub report_hash: String,
}

fn round_sector(sector: ChargeSectorEnergy) -> ChargeSectorEnergy {
    ChargeSectorEnergy {
        energy: round_f64(sector.energy),
        ..sector
    }
}

fn round_summary(summary: SectorSummary) -> SectorSummary {
    SectorSummary {
        energy: round_f64(summary.energy),
        particle_number: round_f64(summary.particle_number),
        ..summary
    }
}

impl CompositionReport {
    /// Rounds recorded values and stamps `report_hash`.
    pub fn seal(mut self) -> Result<Self, PrepError> {
        self.charging = ChargingOptimum {
            even: round_sector(self.charging.even),
            odd: round_sector(self.charging.odd),
        };
        self.lead_energy = round_f64(self.lead_energy);
        self.scatterer = ScattererSummary::new(
            round_summary(self.scatterer.even),
            round_summary(self.scatterer.odd),
        );
        self.scatterer.gap = round_f64(self.scatterer.gap);
        self.total_even = round_f64(self.total_even);
        self.total_odd = round_f64(self.total_odd);
        self.particle_number = round_f64(self.particle_number);
        for row in &mut self.orbitals {
            row.energy = round_f64(row.energy);
        }
        self.report_hash = self.compute_hash()?;
        Ok(self)
    }

    /// Hash of the report with `report_hash` cleared.
    pub fn compute_hash(&self) -> Result<String, PrepError> {
        let mut unsealed = self.clone();
        unsealed.report_hash = String::new();
        stable_hash_string(&unsealed)
    }

    /// Returns `true` when `report_hash` matches the content.
    pub fn verify_hash(&self) -> Result<bool, PrepError> {
        Ok(self.compute_hash()? == self.report_hash)
    }
}
