//! Second-quantised fermionic operators on one-based orbitals.

use std::fmt;

use meso_core::errors::{ErrorInfo, PrepError};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Single ladder operator acting on a one-based orbital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", content = "orbital", rename_all = "kebab-case")]
pub enum LadderOp {
    /// Creation operator `Cdag`.
    Create(usize),
    /// Annihilation operator `C`.
    Annihilate(usize),
    /// Number operator `N = Cdag C`.
    Number(usize),
}

impl LadderOp {
    /// Orbital the operator acts on.
    pub fn orbital(&self) -> usize {
        match self {
            LadderOp::Create(j) | LadderOp::Annihilate(j) | LadderOp::Number(j) => *j,
        }
    }

    /// Returns `true` when the operator changes the particle number by one.
    pub fn flips_parity(&self) -> bool {
        !matches!(self, LadderOp::Number(_))
    }
}

impl fmt::Display for LadderOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LadderOp::Create(j) => write!(f, "Cdag_{j}"),
            LadderOp::Annihilate(j) => write!(f, "C_{j}"),
            LadderOp::Number(j) => write!(f, "N_{j}"),
        }
    }
}

/// `coefficient * ops[0] * ops[1] * ...`; the rightmost operator acts first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorTerm {
    /// Complex prefactor.
    pub coefficient: Complex64,
    /// Ladder operators in product order.
    pub ops: Vec<LadderOp>,
}

impl OperatorTerm {
    /// Returns `true` when the term maps a parity sector onto itself.
    pub fn preserves_parity(&self) -> bool {
        self.ops.iter().filter(|op| op.flips_parity()).count() % 2 == 0
    }
}

/// Sum of ladder-operator products over `num_orbitals` orbitals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FermionOperator {
    num_orbitals: usize,
    terms: Vec<OperatorTerm>,
}

impl FermionOperator {
    /// Creates an empty operator over orbitals `1..=num_orbitals`.
    pub fn new(num_orbitals: usize) -> Self {
        Self {
            num_orbitals,
            terms: Vec::new(),
        }
    }

    /// Appends `coefficient * ops`. Terms with a zero coefficient are dropped.
    pub fn add_term(
        &mut self,
        coefficient: Complex64,
        ops: Vec<LadderOp>,
    ) -> Result<(), PrepError> {
        if !coefficient.re.is_finite() || !coefficient.im.is_finite() {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("non-finite-coefficient", "operator coefficients must be finite")
                    .with_context("coefficient", coefficient),
            ));
        }
        if let Some(op) = ops
            .iter()
            .find(|op| op.orbital() == 0 || op.orbital() > self.num_orbitals)
        {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new(
                    "orbital-out-of-range",
                    "ladder operator acts outside 1..=num_orbitals",
                )
                .with_context("op", op)
                .with_context("num_orbitals", self.num_orbitals),
            ));
        }
        if coefficient == Complex64::new(0.0, 0.0) {
            return Ok(());
        }
        self.terms.push(OperatorTerm { coefficient, ops });
        Ok(())
    }

    /// Appends the real one-body term `value * N_orbital`.
    pub fn add_number(&mut self, orbital: usize, value: f64) -> Result<(), PrepError> {
        self.add_term(Complex64::new(value, 0.0), vec![LadderOp::Number(orbital)])
    }

    /// Number of orbitals the operator is defined on.
    pub fn num_orbitals(&self) -> usize {
        self.num_orbitals
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[OperatorTerm] {
        &self.terms
    }

    /// Number of stored terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` when no term is stored.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns `true` when every term conserves fermion parity.
    pub fn preserves_parity(&self) -> bool {
        self.terms.iter().all(OperatorTerm::preserves_parity)
    }
}
