//! Diagonalisation of quadratic segment Hamiltonians into sorted orbitals.

use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::SegmentId;
use nalgebra::{DMatrix, SymmetricEigen};

use crate::orbital::SegmentBasis;

/// Diagonalises a real symmetric single-particle Hamiltonian.
///
/// Orbitals are returned in ascending energy order with their eigenvectors
/// attached as real-space modes. Each mode is sign-fixed so that its
/// largest-magnitude amplitude is positive.
pub fn from_hamiltonian(
    segment: SegmentId,
    hamiltonian: DMatrix<f64>,
) -> Result<SegmentBasis, PrepError> {
    let n = hamiltonian.nrows();
    if n == 0 || hamiltonian.ncols() != n {
        return Err(PrepError::InvalidInput(
            ErrorInfo::new(
                "bad-hamiltonian-shape",
                "segment Hamiltonian must be square and non-empty",
            )
            .with_context("segment", segment)
            .with_context("rows", n)
            .with_context("cols", hamiltonian.ncols()),
        ));
    }
    if hamiltonian.iter().any(|value| !value.is_finite()) {
        return Err(PrepError::invalid(
            "non-finite-hamiltonian",
            "segment Hamiltonian contains non-finite entries",
        ));
    }
    let asymmetry = (&hamiltonian - hamiltonian.transpose()).amax();
    if asymmetry > 1e-12 {
        return Err(PrepError::InvalidInput(
            ErrorInfo::new("non-symmetric-hamiltonian", "segment Hamiltonian must be symmetric")
                .with_context("segment", segment)
                .with_context("asymmetry", asymmetry),
        ));
    }

    let eigen = SymmetricEigen::new(hamiltonian);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    let energies = order.iter().map(|&k| eigen.eigenvalues[k]).collect();
    let modes = order
        .iter()
        .map(|&k| {
            let column = eigen.eigenvectors.column(k);
            let pivot = column.iter().copied().fold(0.0_f64, |acc, value| {
                if value.abs() > acc.abs() {
                    value
                } else {
                    acc
                }
            });
            let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
            column.iter().map(|value| sign * value).collect()
        })
        .collect();
    SegmentBasis::with_modes(segment, energies, modes)
}

/// Open uniform chain with nearest-neighbour hopping `-hopping` and diagonal `onsite`.
pub fn uniform_chain(
    segment: SegmentId,
    length: usize,
    hopping: f64,
    onsite: f64,
) -> Result<SegmentBasis, PrepError> {
    if length == 0 {
        return Err(PrepError::InvalidInput(
            ErrorInfo::new("empty-chain", "chain length must be at least one")
                .with_context("segment", segment),
        ));
    }
    let mut hamiltonian = DMatrix::<f64>::zeros(length, length);
    for j in 0..length {
        hamiltonian[(j, j)] = onsite;
        if j + 1 < length {
            hamiltonian[(j, j + 1)] = -hopping;
            hamiltonian[(j + 1, j)] = -hopping;
        }
    }
    from_hamiltonian(segment, hamiltonian)
}
