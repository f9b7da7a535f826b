//! Occupation-number basis with Jordan-Wigner signs.
//!
//! A basis state over `n` orbitals is a bit mask in which orbital `j` sits at
//! bit `n - j`, so orbital 1 is the most significant bit. Read as an integer the
//! mask is the dense amplitude index used by [`meso_mps::Mps::to_dense`].

use std::collections::BTreeMap;

use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::Parity;
use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::operator::{FermionOperator, LadderOp};

/// Largest orbital count the bit-mask basis can address.
pub const MAX_FOCK_ORBITALS: usize = 24;

fn bit(num_orbitals: usize, orbital: usize) -> usize {
    1 << (num_orbitals - orbital)
}

/// Number of occupied orbitals with index below `orbital`.
fn occupied_before(num_orbitals: usize, state: usize, orbital: usize) -> u32 {
    (state >> (num_orbitals - orbital + 1)).count_ones()
}

/// Applies `ops` (rightmost first) to a basis state.
///
/// Returns the resulting basis state and its sign, or `None` when the product
/// annihilates the state.
pub fn apply(num_orbitals: usize, ops: &[LadderOp], state: usize) -> Option<(usize, f64)> {
    let mut current = state;
    let mut sign = 1.0;
    for op in ops.iter().rev() {
        let mask = bit(num_orbitals, op.orbital());
        let occupied = current & mask != 0;
        match op {
            LadderOp::Number(_) => {
                if !occupied {
                    return None;
                }
            }
            LadderOp::Create(j) => {
                if occupied {
                    return None;
                }
                if occupied_before(num_orbitals, current, *j) % 2 == 1 {
                    sign = -sign;
                }
                current |= mask;
            }
            LadderOp::Annihilate(j) => {
                if !occupied {
                    return None;
                }
                if occupied_before(num_orbitals, current, *j) % 2 == 1 {
                    sign = -sign;
                }
                current &= !mask;
            }
        }
    }
    Some((current, sign))
}

/// Basis states of one fermion-parity sector, in increasing mask order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParitySector {
    parity: Parity,
    num_orbitals: usize,
    states: Vec<usize>,
    index: BTreeMap<usize, usize>,
}

impl ParitySector {
    /// Enumerates the sector over `num_orbitals` orbitals.
    pub fn new(num_orbitals: usize, parity: Parity) -> Result<Self, PrepError> {
        if num_orbitals == 0 || num_orbitals > MAX_FOCK_ORBITALS {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("fock-size", "orbital count outside the supported Fock range")
                    .with_context("num_orbitals", num_orbitals)
                    .with_context("max", MAX_FOCK_ORBITALS),
            ));
        }
        let states: Vec<usize> = (0..1usize << num_orbitals)
            .filter(|state| Parity::of(i64::from(state.count_ones())) == parity)
            .collect();
        let index = states
            .iter()
            .enumerate()
            .map(|(idx, &state)| (state, idx))
            .collect();
        Ok(Self {
            parity,
            num_orbitals,
            states,
            index,
        })
    }

    /// Parity of every state in the sector.
    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Number of orbitals.
    pub fn num_orbitals(&self) -> usize {
        self.num_orbitals
    }

    /// Sector dimension.
    pub fn dim(&self) -> usize {
        self.states.len()
    }

    /// Basis masks in sector order.
    pub fn states(&self) -> &[usize] {
        &self.states
    }

    /// Sector index of a basis mask.
    pub fn position(&self, state: usize) -> Option<usize> {
        self.index.get(&state).copied()
    }

    /// Dense matrix of `op` restricted to the sector.
    pub fn hamiltonian(&self, op: &FermionOperator) -> Result<DMatrix<Complex64>, PrepError> {
        if op.num_orbitals() != self.num_orbitals {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new(
                    "operator-size-mismatch",
                    "operator and sector disagree on orbital count",
                )
                .with_context("operator", op.num_orbitals())
                .with_context("sector", self.num_orbitals),
            ));
        }
        let dim = self.dim();
        let mut matrix = DMatrix::from_element(dim, dim, Complex64::new(0.0, 0.0));
        for (col, &state) in self.states.iter().enumerate() {
            for term in op.terms() {
                let Some((target, sign)) = apply(self.num_orbitals, &term.ops, state) else {
                    continue;
                };
                let row = self.position(target).ok_or_else(|| {
                    PrepError::InvalidInput(
                        ErrorInfo::new(
                            "parity-breaking-term",
                            "operator term leaves the parity sector",
                        )
                        .with_context("parity", self.parity),
                    )
                })?;
                matrix[(row, col)] += term.coefficient * sign;
            }
        }
        Ok(matrix)
    }

    /// Scatters sector amplitudes into a full `2^n` dense vector.
    pub fn embed(&self, amplitudes: &[Complex64]) -> Vec<Complex64> {
        let mut dense = vec![Complex64::new(0.0, 0.0); 1 << self.num_orbitals];
        for (&state, amplitude) in self.states.iter().zip(amplitudes) {
            dense[state] = *amplitude;
        }
        dense
    }
}

/// Parity carried by a dense amplitude vector, if it has a definite one.
pub fn dense_parity(amplitudes: &[Complex64]) -> Option<Parity> {
    let (even, odd) = amplitudes
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(even, odd), (state, amplitude)| {
            if state.count_ones() % 2 == 0 {
                (even + amplitude.norm_sqr(), odd)
            } else {
                (even, odd + amplitude.norm_sqr())
            }
        });
    let total = even + odd;
    if total == 0.0 {
        return None;
    }
    if odd <= 1e-12 * total {
        Some(Parity::Even)
    } else if even <= 1e-12 * total {
        Some(Parity::Odd)
    } else {
        None
    }
}
