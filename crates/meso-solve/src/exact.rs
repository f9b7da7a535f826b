//! Exact diagonalisation inside one parity sector.

use meso_core::errors::{ErrorInfo, PrepError};
use meso_mps::{sub_fermions, Mps, SiteKind};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use tracing::debug;

use crate::fock::{dense_parity, ParitySector, MAX_FOCK_ORBITALS};
use crate::operator::FermionOperator;
use crate::solver::{GroundStateSolver, SolvedState, SolverConfig};

fn hermiticity_defect(matrix: &DMatrix<Complex64>) -> f64 {
    (matrix - matrix.adjoint()).norm()
}

/// Dense solver for small segments.
///
/// The seed only selects the parity sector; the sector Hamiltonian is built
/// explicitly and diagonalised in full.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactDiagonalization;

impl ExactDiagonalization {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }

    fn check_inputs(
        &self,
        op: &FermionOperator,
        seed: &Mps,
        config: &SolverConfig,
    ) -> Result<(), PrepError> {
        let n = op.num_orbitals();
        let limit = config.max_orbitals.min(MAX_FOCK_ORBITALS);
        if n == 0 || n > limit {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("too-many-orbitals", "orbital count exceeds the exact solver limit")
                    .with_context("num_orbitals", n)
                    .with_context("max_orbitals", limit)
                    .with_hint("raise solver.max_orbitals or shrink the scatterer"),
            ));
        }
        if seed.len() != n {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new(
                    "seed-length-mismatch",
                    "seed and operator disagree on orbital count",
                )
                .with_context("seed", seed.len())
                .with_context("operator", n),
            ));
        }
        if seed.sites().iter().any(|site| site.kind != SiteKind::Fermion) {
            return Err(PrepError::invalid(
                "seed-site-kind",
                "seed must consist of fermionic sites only",
            ));
        }
        if !op.preserves_parity() {
            return Err(PrepError::invalid(
                "parity-breaking-operator",
                "operator mixes fermion-parity sectors",
            ));
        }
        Ok(())
    }
}

impl GroundStateSolver for ExactDiagonalization {
    fn name(&self) -> &str {
        "exact-diagonalization"
    }

    fn ground_state(
        &self,
        op: &FermionOperator,
        seed: &Mps,
        config: &SolverConfig,
    ) -> Result<SolvedState, PrepError> {
        self.check_inputs(op, seed, config)?;
        let n = op.num_orbitals();
        let parity = dense_parity(&seed.to_dense()?).ok_or_else(|| {
            PrepError::invalid("seed-parity", "seed has no definite fermion parity")
        })?;
        let sector = ParitySector::new(n, parity)?;
        let hamiltonian = sector.hamiltonian(op)?;

        let scale = hamiltonian.norm().max(1.0);
        let defect = hermiticity_defect(&hamiltonian);
        if defect > 1e-10 * scale {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("non-hermitian", "operator is not Hermitian")
                    .with_context("defect", defect),
            ));
        }

        let eigen = hamiltonian.clone().symmetric_eigen();
        let (lowest, energy) = eigen
            .eigenvalues
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (idx, value)| match best {
                Some((_, current)) if current <= value => best,
                _ => Some((idx, value)),
            })
            .ok_or_else(|| {
                PrepError::SolverNonConvergence(ErrorInfo::new(
                    "empty-spectrum",
                    "eigen-decomposition returned no eigenvalues",
                ))
            })?;
        let vector: DVector<Complex64> = eigen.eigenvectors.column(lowest).into_owned();
        let residual = (&hamiltonian * &vector - &vector * Complex64::new(energy, 0.0)).norm();
        if !energy.is_finite() || residual > config.residual_tolerance * (1.0 + energy.abs()) {
            return Err(PrepError::SolverNonConvergence(
                ErrorInfo::new(
                    "residual-too-large",
                    "ground-state eigenpair failed the residual check",
                )
                .with_context("energy", energy)
                .with_context("residual", residual)
                .with_context("tolerance", config.residual_tolerance),
            ));
        }
        debug!(
            solver = self.name(),
            parity = %parity,
            sector_dim = sector.dim(),
            energy,
            residual,
            "sector ground state"
        );

        let dense = sector.embed(vector.as_slice());
        let mut state = Mps::from_dense(&sub_fermions(n), &dense, &config.truncation())?;
        state.normalize()?;
        Ok(SolvedState { state, energy })
    }
}
