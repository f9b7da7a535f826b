//! Single-particle orbitals of one segment.

use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::SegmentId;
use serde::{Deserialize, Serialize};

fn unknown_location(segment: SegmentId, local: usize, len: usize) -> PrepError {
    PrepError::UnknownLocation(
        ErrorInfo::new("local-index-out-of-range", "local orbital index is not in 1..=len")
            .with_context("segment", segment)
            .with_context("local_index", local)
            .with_context("len", len),
    )
}

/// One single-particle basis state with a definite energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbital {
    /// Segment owning the orbital.
    pub segment: SegmentId,
    /// One-based index within the segment.
    pub local_index: usize,
    /// Single-particle energy.
    pub energy: f64,
}

/// Ordered orbitals of a single segment.
///
/// Energies are stored in the order produced by the diagonalisation. Optional
/// mode amplitudes hold, for each orbital, its real-space wavefunction over
/// the segment's lattice sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentBasis {
    segment: SegmentId,
    energies: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    modes: Option<Vec<Vec<f64>>>,
}

impl SegmentBasis {
    /// Creates a basis from an ordered spectrum.
    pub fn new(segment: SegmentId, energies: Vec<f64>) -> Result<Self, PrepError> {
        if let Some(idx) = energies.iter().position(|en| !en.is_finite()) {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("non-finite-energy", "orbital energies must be finite")
                    .with_context("segment", segment)
                    .with_context("local_index", idx + 1),
            ));
        }
        Ok(Self {
            segment,
            energies,
            modes: None,
        })
    }

    /// Creates a basis with real-space mode amplitudes attached.
    ///
    /// Every mode must have the same number of lattice sites, and there must
    /// be one mode per energy.
    pub fn with_modes(
        segment: SegmentId,
        energies: Vec<f64>,
        modes: Vec<Vec<f64>>,
    ) -> Result<Self, PrepError> {
        let mut basis = Self::new(segment, energies)?;
        if modes.len() != basis.energies.len() {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("mode-count-mismatch", "one mode per orbital is required")
                    .with_context("segment", segment)
                    .with_context("orbitals", basis.energies.len())
                    .with_context("modes", modes.len()),
            ));
        }
        let sites = modes.first().map(Vec::len).unwrap_or(0);
        if modes.iter().any(|mode| mode.len() != sites) {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new("ragged-modes", "all modes must span the same lattice sites")
                    .with_context("segment", segment),
            ));
        }
        basis.modes = Some(modes);
        Ok(basis)
    }

    /// Basis of the single capacitance mode.
    pub fn capacitance() -> Self {
        Self {
            segment: SegmentId::Capacitance,
            energies: vec![0.0],
            modes: None,
        }
    }

    /// Segment owning this basis.
    pub fn segment(&self) -> SegmentId {
        self.segment
    }

    /// Number of orbitals.
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    /// Returns `true` when the basis holds no orbitals.
    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Energy of the orbital with one-based `local` index.
    pub fn energy(&self, local: usize) -> Result<f64, PrepError> {
        if local == 0 || local > self.energies.len() {
            return Err(unknown_location(self.segment, local, self.energies.len()));
        }
        Ok(self.energies[local - 1])
    }

    /// All energies in local order.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Iterates over the orbitals in local order.
    pub fn orbitals(&self) -> impl Iterator<Item = Orbital> + '_ {
        self.energies
            .iter()
            .enumerate()
            .map(move |(idx, &energy)| Orbital {
                segment: self.segment,
                local_index: idx + 1,
                energy,
            })
    }

    /// Returns `true` when real-space mode amplitudes are attached.
    pub fn has_modes(&self) -> bool {
        self.modes.is_some()
    }

    /// Real-space amplitudes of the orbital with one-based `local` index.
    pub fn mode(&self, local: usize) -> Option<&[f64]> {
        if local == 0 {
            return None;
        }
        self.modes
            .as_ref()
            .and_then(|modes| modes.get(local - 1))
            .map(Vec::as_slice)
    }

    /// Amplitude overlap of orbital `a` on site `j` with orbital `b` on site `j + 1`,
    /// summed over all lattice bonds: `sum_j phi_a(j) phi_b(j+1)`.
    ///
    /// Returns `None` when no modes are attached.
    pub fn bond_overlap(&self, a: usize, b: usize) -> Result<Option<f64>, PrepError> {
        if self.modes.is_none() {
            return Ok(None);
        }
        let (Some(phi_a), Some(phi_b)) = (self.mode(a), self.mode(b)) else {
            let bad = if self.mode(a).is_none() { a } else { b };
            return Err(unknown_location(self.segment, bad, self.energies.len()));
        };
        let overlap = phi_a
            .iter()
            .zip(phi_b.iter().skip(1))
            .map(|(x, y)| x * y)
            .sum();
        Ok(Some(overlap))
    }
}
