//! Alternating product-state filling used as a quench starting point.

use meso_basis::PartitionedBasisManager;
use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::{LocalLabel, SegmentId};
use meso_mps::{Mps, SiteId, SiteKind};
use tracing::info;

use crate::state::{GlobalState, PositionState};

/// Places `particles` fermions on even global positions, then on odd ones,
/// skipping the capacitance position.
///
/// The capacitance site records how many of the particles landed in the
/// scatterer.
pub fn alternating_filling(
    basis: &PartitionedBasisManager,
    particles: usize,
    max_occupancy: u32,
) -> Result<GlobalState, PrepError> {
    let ordering = basis.ordering()?;
    let charge_position = ordering.to_global(SegmentId::Capacitance, 1)?;
    let fermionic = ordering.len() - 1;
    if particles > fermionic {
        return Err(PrepError::InvalidInput(
            ErrorInfo::new("too-many-particles", "more particles than fermionic positions")
                .with_context("particles", particles)
                .with_context("positions", fermionic),
        ));
    }

    let mut occupied = vec![false; ordering.len() + 1];
    let candidates = (2..=ordering.len())
        .step_by(2)
        .chain((1..=ordering.len()).step_by(2))
        .filter(|&position| position != charge_position);
    for position in candidates.take(particles) {
        occupied[position] = true;
    }

    let mut device = 0usize;
    for position in (1..=ordering.len()).filter(|&position| occupied[position]) {
        if ordering.to_local(position)?.0 == SegmentId::Scatterer {
            device += 1;
        }
    }
    let charge = i32::try_from(device)
        .ok()
        .filter(|&charge| charge.unsigned_abs() <= max_occupancy)
        .ok_or_else(|| {
            PrepError::InvalidInput(
                ErrorInfo::new(
                    "charge-out-of-range",
                    "scatterer charge exceeds the charge site range",
                )
                .with_context("charge", device)
                .with_context("max_occupancy", max_occupancy),
            )
        })?;

    let mut sites = Vec::with_capacity(ordering.len());
    let mut labels = Vec::with_capacity(ordering.len());
    for (position, segment, _) in ordering.iter() {
        if segment == SegmentId::Capacitance {
            sites.push(SiteId::global(position, SiteKind::Charge { max_occupancy }));
            labels.push(LocalLabel::Charge(charge));
        } else {
            sites.push(SiteId::global(position, SiteKind::Fermion));
            labels.push(LocalLabel::from_occupied(occupied[position]));
        }
    }
    info!(particles, device_charge = charge, charge_position, "alternating filling");

    let mut mps = Mps::product_state(&sites, &labels)?;
    mps.canonicalize(1)?;
    let positions = labels.into_iter().map(PositionState::Label).collect();
    GlobalState::new(mps, positions)
}
