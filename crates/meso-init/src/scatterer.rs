//! Scatterer ground states in both fermion-parity sectors.

use meso_basis::SegmentBasis;
use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::{LocalLabel, Parity};
use meso_mps::{sub_fermions, Mps};
use meso_solve::{FermionOperator, GroundStateSolver, LadderOp, SolverConfig};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::filling::{fill, EnergyConvention};
use crate::state::SegmentState;

/// Pairing coefficients below this magnitude are dropped.
const COEFFICIENT_FLOOR: f64 = 1e-14;

/// Which orbital pairs receive a pairing term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PairingPolicy {
    /// Consecutive orbitals `(i, i+1)` and `(i+1, i)`.
    ///
    /// With mode amplitudes the coefficient is the bond overlap; without them
    /// the two orderings carry `+1/2` and `-1/2`, which together add up to a
    /// single `C_i C_{i+1}` term.
    #[default]
    NearestNeighbour,
    /// Every ordered pair, weighted by the bond overlap of the two modes.
    ///
    /// This projects uniform nearest-neighbour real-space pairing onto the
    /// orbital basis and requires mode amplitudes.
    RealSpaceBond,
}

/// Inputs of the interacting scatterer problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingParams {
    /// Scatterer chemical potential.
    pub mu: f64,
    /// Pairing amplitude.
    pub delta: Complex64,
    /// Orbital pairs that receive pairing terms.
    pub policy: PairingPolicy,
}

/// Ground state of the scatterer in one parity sector.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorState {
    /// Fermion parity of the sector.
    pub parity: Parity,
    /// Local state of the scatterer.
    pub state: SegmentState,
    /// Sector ground-state energy.
    pub energy: f64,
    /// Expected particle number of `state`.
    pub particle_number: f64,
}

/// Even and odd scatterer ground states.
#[derive(Debug, Clone, PartialEq)]
pub struct ScattererSectors {
    /// Even-parity ground state.
    pub even: SectorState,
    /// Odd-parity ground state.
    pub odd: SectorState,
}

impl ScattererSectors {
    /// Sector of the given parity.
    pub fn sector(&self, parity: Parity) -> &SectorState {
        match parity {
            Parity::Even => &self.even,
            Parity::Odd => &self.odd,
        }
    }

    /// Consumes the pair and returns the sector of the given parity.
    pub fn into_sector(self, parity: Parity) -> SectorState {
        match parity {
            Parity::Even => self.even,
            Parity::Odd => self.odd,
        }
    }
}

fn check_scatterer(basis: &SegmentBasis) -> Result<(), PrepError> {
    if basis.is_empty() {
        return Err(PrepError::InvalidInput(
            ErrorInfo::new("empty-scatterer", "scatterer basis holds no orbitals")
                .with_context("segment", basis.segment()),
        ));
    }
    Ok(())
}

/// Ordered orbital pairs `(a, b)` and their coupling coefficients `c_ab`.
pub fn pairing_coefficients(
    basis: &SegmentBasis,
    policy: PairingPolicy,
) -> Result<Vec<(usize, usize, f64)>, PrepError> {
    let n = basis.len();
    let mut pairs = Vec::new();
    match policy {
        PairingPolicy::NearestNeighbour => {
            for i in 1..n {
                for (a, b, fallback) in [(i, i + 1, 0.5), (i + 1, i, -0.5)] {
                    let coefficient = basis.bond_overlap(a, b)?.unwrap_or(fallback);
                    pairs.push((a, b, coefficient));
                }
            }
        }
        PairingPolicy::RealSpaceBond => {
            if !basis.has_modes() {
                return Err(PrepError::InvalidInput(
                    ErrorInfo::new("missing-modes", "real-space pairing needs mode amplitudes")
                        .with_context("segment", basis.segment())
                        .with_hint("build the scatterer from a tight-binding chain"),
                ));
            }
            for a in 1..=n {
                for b in (1..=n).filter(|&b| b != a) {
                    if let Some(coefficient) = basis.bond_overlap(a, b)? {
                        pairs.push((a, b, coefficient));
                    }
                }
            }
        }
    }
    pairs.retain(|&(_, _, c)| c.abs() > COEFFICIENT_FLOOR);
    Ok(pairs)
}

/// Pairing Hamiltonian of the scatterer on local orbitals `1..=Ns`.
///
/// `sum_i (e_i - mu) N_i - sum_ab (delta c_ab C_a C_b + conj(delta c_ab) Cdag_b Cdag_a)`.
pub fn build_pairing_operator(
    basis: &SegmentBasis,
    mu: f64,
    delta: Complex64,
    policy: PairingPolicy,
) -> Result<FermionOperator, PrepError> {
    check_scatterer(basis)?;
    if !mu.is_finite() || !delta.re.is_finite() || !delta.im.is_finite() {
        return Err(PrepError::InvalidInput(
            ErrorInfo::new("non-finite-pairing", "scatterer potential and pairing must be finite")
                .with_context("mu", mu)
                .with_context("delta", delta),
        ));
    }
    let mut op = FermionOperator::new(basis.len());
    for orbital in basis.orbitals() {
        op.add_number(orbital.local_index, orbital.energy - mu)?;
    }
    for (a, b, c) in pairing_coefficients(basis, policy)? {
        let amplitude = delta * c;
        op.add_term(-amplitude, vec![LadderOp::Annihilate(a), LadderOp::Annihilate(b)])?;
        op.add_term(-amplitude.conj(), vec![LadderOp::Create(b), LadderOp::Create(a)])?;
    }
    Ok(op)
}

/// Quasiparticle-vacuum and single-quasiparticle sectors of a scatterer
/// whose spectrum already holds Bogoliubov quasiparticle energies.
///
/// The even sector is the vacuum at energy zero; the odd sector occupies the
/// first quasiparticle and costs its energy, the gap.
pub fn quasiparticle_sectors(basis: &SegmentBasis) -> Result<ScattererSectors, PrepError> {
    check_scatterer(basis)?;
    let gap = basis.energy(1)?;
    let vacuum = vec![LocalLabel::Empty; basis.len()];
    let mut excited = vacuum.clone();
    excited[0] = LocalLabel::Occupied;
    Ok(ScattererSectors {
        even: SectorState {
            parity: Parity::Even,
            state: SegmentState::Labels(vacuum),
            energy: 0.0,
            particle_number: 0.0,
        },
        odd: SectorState {
            parity: Parity::Odd,
            state: SegmentState::Labels(excited),
            energy: gap,
            particle_number: 1.0,
        },
    })
}

/// Non-interacting scatterer: the Fermi sea at `mu` stands in for both
/// sectors, with zero sector energy so that charging alone decides.
pub fn non_interacting_sectors(
    basis: &SegmentBasis,
    mu: f64,
    convention: EnergyConvention,
) -> Result<ScattererSectors, PrepError> {
    check_scatterer(basis)?;
    let filling = fill(basis, mu, convention)?;
    let particles = filling.particles as f64;
    let sector = |parity| SectorState {
        parity,
        state: SegmentState::Labels(filling.labels.clone()),
        energy: 0.0,
        particle_number: particles,
    };
    Ok(ScattererSectors {
        even: sector(Parity::Even),
        odd: sector(Parity::Odd),
    })
}

/// Solves the interacting scatterer in both parity sectors.
#[derive(Debug, Clone)]
pub struct ScattererGroundStateProvider<S> {
    solver: S,
}

impl<S: GroundStateSolver> ScattererGroundStateProvider<S> {
    /// Wraps a ground-state solver.
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    /// Underlying solver.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Ground states seeded from the vacuum (even) and from orbital 1 occupied (odd).
    pub fn solve(
        &self,
        basis: &SegmentBasis,
        params: &PairingParams,
        config: &SolverConfig,
    ) -> Result<ScattererSectors, PrepError> {
        let op = build_pairing_operator(basis, params.mu, params.delta, params.policy)?;
        let sites = sub_fermions(basis.len());
        let vacuum = vec![LocalLabel::Empty; basis.len()];
        let mut single = vacuum.clone();
        single[0] = LocalLabel::Occupied;

        let even_seed = Mps::product_state(&sites, &vacuum)?;
        let odd_seed = Mps::product_state(&sites, &single)?;
        let even = self.solve_sector(&op, Parity::Even, &even_seed, config)?;
        let odd = self.solve_sector(&op, Parity::Odd, &odd_seed, config)?;
        info!(
            solver = self.solver.name(),
            terms = op.len(),
            even_energy = even.energy,
            even_particles = even.particle_number,
            odd_energy = odd.energy,
            odd_particles = odd.particle_number,
            "scatterer sectors"
        );
        Ok(ScattererSectors { even, odd })
    }

    fn solve_sector(
        &self,
        op: &FermionOperator,
        parity: Parity,
        seed: &Mps,
        config: &SolverConfig,
    ) -> Result<SectorState, PrepError> {
        let solved = self.solver.ground_state(op, seed, config).map_err(|err| match err {
            PrepError::SolverNonConvergence(info) => {
                PrepError::SolverNonConvergence(info.with_context("parity", parity))
            }
            other => other,
        })?;
        let particle_number = solved.state.particle_number()?;
        Ok(SectorState {
            parity,
            state: SegmentState::Entangled(solved.state),
            energy: solved.energy,
            particle_number,
        })
    }
}
