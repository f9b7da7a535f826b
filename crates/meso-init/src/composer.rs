//! Sector selection and assembly of the global initial state.

use meso_basis::{GlobalOrdering, PartitionedBasisManager};
use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::{LocalLabel, Parity, SegmentId};
use meso_mps::{Mps, SiteId, SiteKind};
use meso_solve::{GroundStateSolver, SolverConfig};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::charging::{best_sectors, ChargingParams};
use crate::filling::{fill, EnergyConvention, SegmentFilling};
use crate::report::{CompositionReport, OrbitalRow, ScattererSummary, SectorSummary};
use crate::scatterer::{
    non_interacting_sectors, quasiparticle_sectors, PairingParams, PairingPolicy,
    ScattererGroundStateProvider, ScattererSectors,
};
use crate::state::{GlobalState, PositionState, SegmentState};

fn compose_error(code: &str, message: impl Into<String>) -> PrepError {
    PrepError::InvalidInput(ErrorInfo::new(code, message))
}

/// Chemical potentials of the three fermionic segments.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChemicalPotentials {
    /// Left lead.
    #[serde(default)]
    pub left: f64,
    /// Right lead.
    #[serde(default)]
    pub right: f64,
    /// Scatterer.
    #[serde(default)]
    pub scatterer: f64,
}

impl ChemicalPotentials {
    /// Potential of a fermionic segment.
    pub fn of(&self, segment: SegmentId) -> Option<f64> {
        match segment {
            SegmentId::LeftLead => Some(self.left),
            SegmentId::RightLead => Some(self.right),
            SegmentId::Scatterer => Some(self.scatterer),
            SegmentId::Capacitance => None,
        }
    }
}

/// Physics of the scatterer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScattererModel {
    /// Fermi sea; sector energies vanish.
    #[default]
    NonInteracting,
    /// Spectrum holds quasiparticle energies; the odd sector pays the gap.
    Quasiparticle,
    /// Pairing Hamiltonian solved in both parity sectors.
    Pairing {
        /// Pairing amplitude as `[re, im]`.
        delta: Complex64,
        /// Orbital pairs receiving pairing terms.
        #[serde(default)]
        policy: PairingPolicy,
    },
}

/// Everything the composer needs besides the basis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComposeOptions {
    /// Segment chemical potentials.
    #[serde(default)]
    pub potentials: ChemicalPotentials,
    /// Charging model.
    #[serde(default)]
    pub charging: ChargingParams,
    /// Scatterer physics.
    #[serde(default)]
    pub model: ScattererModel,
    /// Energy bookkeeping of the leads.
    #[serde(default)]
    pub convention: EnergyConvention,
    /// Solver settings for the pairing model.
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Output of [`GroundStateComposer::compose`].
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Normalised global state.
    pub state: GlobalState,
    /// Energies, selection and orbital table.
    pub report: CompositionReport,
}

/// Composes lead fillings, the scatterer state and the capacitance charge
/// into one global state on a finalised basis.
pub struct GroundStateComposer<'a, S> {
    basis: &'a PartitionedBasisManager,
    provider: ScattererGroundStateProvider<S>,
}

impl<'a, S: GroundStateSolver> GroundStateComposer<'a, S> {
    /// Binds the composer to a finalised basis and a solver.
    pub fn new(basis: &'a PartitionedBasisManager, solver: S) -> Self {
        Self {
            basis,
            provider: ScattererGroundStateProvider::new(solver),
        }
    }

    fn validate(&self, options: &ComposeOptions) -> Result<&'a GlobalOrdering, PrepError> {
        let ordering = self.basis.ordering()?;
        for segment in SegmentId::ALL {
            self.basis.segment(segment)?;
        }
        let capacitance = self.basis.segment(SegmentId::Capacitance)?;
        if capacitance.len() != 1 {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new(
                    "capacitance-size",
                    "capacitance segment must hold exactly one orbital",
                )
                .with_context("len", capacitance.len()),
            ));
        }
        let potentials = &options.potentials;
        if ![potentials.left, potentials.right, potentials.scatterer]
            .iter()
            .all(|mu| mu.is_finite())
        {
            return Err(compose_error("non-finite-potential", "chemical potentials must be finite"));
        }
        if u32::try_from(options.charging.max_occupancy).is_err() {
            return Err(PrepError::EmptyDomain(
                ErrorInfo::new(
                    "empty-charge-domain",
                    "max_occupancy must be a non-negative 32-bit value",
                )
                .with_context("max_occupancy", options.charging.max_occupancy),
            ));
        }
        if matches!(options.model, ScattererModel::Pairing { .. })
            && ordering.block(SegmentId::Scatterer).is_none()
        {
            return Err(PrepError::Ordering(
                ErrorInfo::new(
                    "scatterer-not-contiguous",
                    "entangled scatterer needs one contiguous block",
                )
                .with_context("policy", ordering.policy())
                .with_hint("use a placement policy that keeps the scatterer together"),
            ));
        }
        Ok(ordering)
    }

    fn scatterer_sectors(&self, options: &ComposeOptions) -> Result<ScattererSectors, PrepError> {
        let basis = self.basis.segment(SegmentId::Scatterer)?;
        let mu = options.potentials.scatterer;
        match options.model {
            ScattererModel::NonInteracting => {
                non_interacting_sectors(basis, mu, options.convention)
            }
            ScattererModel::Quasiparticle => quasiparticle_sectors(basis),
            ScattererModel::Pairing { delta, policy } => self.provider.solve(
                basis,
                &PairingParams { mu, delta, policy },
                &options.solver,
            ),
        }
    }

    /// Prepares the initial state.
    ///
    /// Leads are filled independently, the scatterer is solved in both parity
    /// sectors, and the parity whose scatterer energy plus best charging
    /// energy is lower is selected; ties select the even sector. The
    /// capacitance site carries the matching optimal charge.
    pub fn compose(&self, options: &ComposeOptions) -> Result<Composition, PrepError> {
        let ordering = self.validate(options)?;

        let left = fill(
            self.basis.segment(SegmentId::LeftLead)?,
            options.potentials.left,
            options.convention,
        )?;
        let right = fill(
            self.basis.segment(SegmentId::RightLead)?,
            options.potentials.right,
            options.convention,
        )?;
        let lead_energy = left.energy + right.energy;
        let lead_particles = left.particles + right.particles;
        info!(
            lead_energy,
            lead_particles,
            left_particles = left.particles,
            right_particles = right.particles,
            "leads filled"
        );

        let sectors = self.scatterer_sectors(options)?;
        let charging = best_sectors(
            options.charging.max_occupancy,
            options.charging.ec,
            options.charging.ng,
        )?;
        let total_even = charging.even.energy + sectors.even.energy;
        let total_odd = charging.odd.energy + sectors.odd.energy;
        let parity = if total_odd < total_even {
            Parity::Odd
        } else {
            Parity::Even
        };
        let charge = charging.sector(parity).charge;
        info!(
            %parity,
            charge,
            total_even,
            total_odd,
            charging_even = charging.even.energy,
            charging_odd = charging.odd.energy,
            "selected charge sector"
        );

        let scatterer = ScattererSummary::new(
            SectorSummary::from(&sectors.even),
            SectorSummary::from(&sectors.odd),
        );
        let selected = sectors.into_sector(parity);
        let state = self.assemble(ordering, options, [&left, &right], &selected.state, charge)?;

        let report = CompositionReport {
            policy: ordering.policy().to_string(),
            selected_parity: parity,
            selected_charge: charge,
            charging,
            lead_energy,
            lead_particles,
            scatterer,
            total_even,
            total_odd,
            particle_number: state.fermion_number()?,
            convention: options.convention,
            orbitals: self.orbital_rows(ordering, &state)?,
            report_hash: String::new(),
        }
        .seal()?;
        Ok(Composition { state, report })
    }

    fn assemble(
        &self,
        ordering: &GlobalOrdering,
        options: &ComposeOptions,
        leads: [&SegmentFilling; 2],
        scatterer: &SegmentState,
        charge: i64,
    ) -> Result<GlobalState, PrepError> {
        let max_occupancy = u32::try_from(options.charging.max_occupancy).map_err(|_| {
            compose_error("charge-range", "max_occupancy does not fit a charge site")
        })?;
        let charge_label = i32::try_from(charge)
            .map(LocalLabel::Charge)
            .map_err(|_| compose_error("charge-range", "selected charge does not fit a label"))?;

        let mut sites = Vec::with_capacity(ordering.len());
        let mut labels = Vec::with_capacity(ordering.len());
        let mut positions = Vec::with_capacity(ordering.len());
        for (position, segment, local) in ordering.iter() {
            let (kind, record) = match segment {
                SegmentId::Capacitance => (
                    SiteKind::Charge { max_occupancy },
                    PositionState::Label(charge_label),
                ),
                SegmentId::Scatterer => (
                    SiteKind::Fermion,
                    match scatterer {
                        SegmentState::Labels(local_labels) => PositionState::Label(
                            local_labels.get(local - 1).copied().ok_or_else(|| {
                                compose_error(
                                    "scatterer-size",
                                    "scatterer state is shorter than its basis",
                                )
                            })?,
                        ),
                        SegmentState::Entangled(_) => PositionState::Entangled,
                    },
                ),
                lead => {
                    let filling = leads
                        .iter()
                        .find(|filling| filling.segment == lead)
                        .ok_or_else(|| {
                            compose_error("missing-lead", "lead filling not available")
                        })?;
                    let label = filling.labels.get(local - 1).copied().ok_or_else(|| {
                        compose_error("lead-size", "lead filling is shorter than its basis")
                    })?;
                    (SiteKind::Fermion, PositionState::Label(label))
                }
            };
            sites.push(SiteId::global(position, kind));
            labels.push(match record {
                PositionState::Label(label) => label,
                PositionState::Entangled => LocalLabel::Empty,
            });
            positions.push(record);
        }

        let mut mps = Mps::product_state(&sites, &labels)?;
        if let SegmentState::Entangled(sub) = scatterer {
            let block = ordering.block(SegmentId::Scatterer).ok_or_else(|| {
                PrepError::Ordering(ErrorInfo::new(
                    "scatterer-not-contiguous",
                    "entangled scatterer needs one contiguous block",
                ))
            })?;
            if sub.len() != block.clone().count() {
                return Err(PrepError::InvalidInput(
                    ErrorInfo::new(
                        "scatterer-size",
                        "entangled state does not cover the scatterer block",
                    )
                    .with_context("state", sub.len())
                    .with_context("block", block.clone().count()),
                ));
            }
            debug!(
                start = *block.start(),
                end = *block.end(),
                bond = sub.max_bond_dim(),
                "grafting scatterer"
            );
            mps.splice(*block.start(), sub.clone())?;
        }
        mps.canonicalize(1)?;
        mps.normalize()?;
        GlobalState::new(mps, positions)
    }

    fn orbital_rows(
        &self,
        ordering: &GlobalOrdering,
        state: &GlobalState,
    ) -> Result<Vec<OrbitalRow>, PrepError> {
        let mut rows = Vec::with_capacity(ordering.len());
        for (position, segment, local) in ordering.iter() {
            let energy = self.basis.segment(segment)?.energy(local)?;
            let record = state.position_state(position)?;
            info!(
                position,
                segment = %segment,
                local,
                energy,
                state = %record,
                "orbital"
            );
            rows.push(OrbitalRow {
                position,
                segment,
                local_index: local,
                energy,
                state: record.to_string(),
            });
        }
        Ok(rows)
    }
}
