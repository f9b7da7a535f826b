#![deny(missing_docs)]
#![doc = "Fermionic operators and ground-state solvers for isolated device segments."]

/// Exact diagonalisation solver.
pub mod exact;
/// Occupation-number basis and parity sectors.
pub mod fock;
/// Fermionic ladder operators and operator sums.
pub mod operator;
/// Solver trait and configuration.
pub mod solver;

pub use exact::ExactDiagonalization;
pub use fock::{apply, dense_parity, ParitySector};
pub use operator::{FermionOperator, LadderOp, OperatorTerm};
pub use solver::{GroundStateSolver, SolvedState, SolverConfig};
