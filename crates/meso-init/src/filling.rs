//! Fermi-sea filling of a segment at a chemical potential.

use meso_basis::SegmentBasis;
use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::{LocalLabel, SegmentId};
use serde::{Deserialize, Serialize};

/// Reference point for accumulated single-particle energies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EnergyConvention {
    /// Sum of bare orbital energies.
    Raw,
    /// Sum of `energy - mu`, the grand-canonical energy.
    #[default]
    RelativeToChemicalPotential,
}

impl EnergyConvention {
    /// Contribution of one occupied orbital.
    pub fn contribution(&self, energy: f64, mu: f64) -> f64 {
        match self {
            EnergyConvention::Raw => energy,
            EnergyConvention::RelativeToChemicalPotential => energy - mu,
        }
    }
}

/// Occupation pattern of one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentFilling {
    /// Segment that was filled.
    pub segment: SegmentId,
    /// Label per local orbital, in local order.
    pub labels: Vec<LocalLabel>,
    /// Accumulated energy of the occupied orbitals.
    pub energy: f64,
    /// Number of occupied orbitals.
    pub particles: usize,
}

/// Occupies every orbital with `energy - mu < 0`.
pub fn fill(
    basis: &SegmentBasis,
    mu: f64,
    convention: EnergyConvention,
) -> Result<SegmentFilling, PrepError> {
    if !mu.is_finite() {
        return Err(PrepError::InvalidInput(
            ErrorInfo::new("non-finite-potential", "chemical potential must be finite")
                .with_context("segment", basis.segment())
                .with_context("mu", mu),
        ));
    }
    let mut labels = Vec::with_capacity(basis.len());
    let mut energy = 0.0;
    let mut particles = 0;
    for &en in basis.energies() {
        let occupied = en - mu < 0.0;
        if occupied {
            energy += convention.contribution(en, mu);
            particles += 1;
        }
        labels.push(LocalLabel::from_occupied(occupied));
    }
    Ok(SegmentFilling {
        segment: basis.segment(),
        labels,
        energy,
        particles,
    })
}
