//! Segment-level and global prepared states.

use std::fmt;

use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::LocalLabel;
use meso_mps::{Mps, SiteKind};
use serde::{Deserialize, Serialize};

/// State of one segment before it is placed in the global chain.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentState {
    /// Product state, one label per local orbital.
    Labels(Vec<LocalLabel>),
    /// Entangled state over sub-domain sites `1..=len`.
    Entangled(Mps),
}

impl SegmentState {
    /// Number of local orbitals covered.
    pub fn len(&self) -> usize {
        match self {
            SegmentState::Labels(labels) => labels.len(),
            SegmentState::Entangled(state) => state.len(),
        }
    }

    /// Returns `true` when the state covers no orbital.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for an entangled state.
    pub fn is_entangled(&self) -> bool {
        matches!(self, SegmentState::Entangled(_))
    }
}

/// What is known about one global position of a prepared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "label", rename_all = "kebab-case")]
pub enum PositionState {
    /// Definite local label.
    Label(LocalLabel),
    /// Part of an entangled block.
    Entangled,
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionState::Label(label) => write!(f, "{label}"),
            PositionState::Entangled => f.write_str("*"),
        }
    }
}

/// Normalised global state together with its per-position description.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalState {
    mps: Mps,
    positions: Vec<PositionState>,
}

impl GlobalState {
    pub(crate) fn new(mps: Mps, positions: Vec<PositionState>) -> Result<Self, PrepError> {
        if mps.len() != positions.len() {
            return Err(PrepError::InvalidInput(
                ErrorInfo::new(
                    "position-count-mismatch",
                    "one position record per site is required",
                )
                .with_context("sites", mps.len())
                .with_context("positions", positions.len()),
            ));
        }
        Ok(Self { mps, positions })
    }

    /// Underlying matrix product state.
    pub fn mps(&self) -> &Mps {
        &self.mps
    }

    /// Consumes the state and returns the matrix product state.
    pub fn into_mps(self) -> Mps {
        self.mps
    }

    /// Number of global positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always `false` for a composed state.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Per-position records in global order.
    pub fn positions(&self) -> &[PositionState] {
        &self.positions
    }

    /// Record of the one-based `position`.
    pub fn position_state(&self, position: usize) -> Result<PositionState, PrepError> {
        if position == 0 || position > self.positions.len() {
            return Err(PrepError::OutOfRange(
                ErrorInfo::new("position-out-of-range", "global position is not in 1..=N")
                    .with_context("position", position)
                    .with_context("len", self.positions.len()),
            ));
        }
        Ok(self.positions[position - 1])
    }

    /// Label at `position`, or `None` inside an entangled block.
    pub fn label(&self, position: usize) -> Result<Option<LocalLabel>, PrepError> {
        Ok(match self.position_state(position)? {
            PositionState::Label(label) => Some(label),
            PositionState::Entangled => None,
        })
    }

    /// Expected number of fermions, excluding the capacitance charge.
    pub fn fermion_number(&self) -> Result<f64, PrepError> {
        self.mps.expect_diagonal(|_, site, index| match site.kind {
            SiteKind::Fermion => index as f64,
            SiteKind::Charge { .. } => 0.0,
        })
    }
}
