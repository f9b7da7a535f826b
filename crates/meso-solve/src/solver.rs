//! Ground-state solver contract.

use meso_core::PrepError;
use meso_mps::{Mps, TruncationOpts};
use serde::{Deserialize, Serialize};

use crate::operator::FermionOperator;

fn default_max_orbitals() -> usize {
    14
}

fn default_residual_tolerance() -> f64 {
    1e-8
}

fn default_svd_cutoff() -> f64 {
    1e-12
}

/// Numerical settings shared by solver implementations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Largest orbital count a solver accepts.
    #[serde(default = "default_max_orbitals")]
    pub max_orbitals: usize,
    /// Bound on the eigen-residual relative to `1 + |E|`.
    #[serde(default = "default_residual_tolerance")]
    pub residual_tolerance: f64,
    /// Relative singular-value cutoff when the result is compressed.
    #[serde(default = "default_svd_cutoff")]
    pub svd_cutoff: f64,
    /// Optional bond-dimension cap for the compressed result.
    #[serde(default)]
    pub max_bond_dim: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_orbitals: default_max_orbitals(),
            residual_tolerance: default_residual_tolerance(),
            svd_cutoff: default_svd_cutoff(),
            max_bond_dim: None,
        }
    }
}

impl SolverConfig {
    /// Truncation options for compressing solver output.
    pub fn truncation(&self) -> TruncationOpts {
        TruncationOpts {
            cutoff: self.svd_cutoff,
            max_bond_dim: self.max_bond_dim,
        }
    }
}

/// Lowest-energy state found by a solver and its energy.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedState {
    /// Normalised state over sub-domain sites.
    pub state: Mps,
    /// Expectation value of the operator in `state`.
    pub energy: f64,
}

/// Finds the lowest eigenstate of a fermionic operator.
///
/// Implementations must return a state in the fermion-parity sector of `seed`.
pub trait GroundStateSolver {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Solves for the ground state of `op` in the parity sector of `seed`.
    fn ground_state(
        &self,
        op: &FermionOperator,
        seed: &Mps,
        config: &SolverConfig,
    ) -> Result<SolvedState, PrepError>;
}
