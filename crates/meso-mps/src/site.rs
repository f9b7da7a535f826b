//! Site identities and local Hilbert spaces.

use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::LocalLabel;
use serde::{Deserialize, Serialize};

/// Local Hilbert space carried by one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SiteKind {
    /// Spinless fermionic orbital, basis `{Emp, Occ}`.
    Fermion,
    /// Integer charge mode with basis `-max_occupancy..=max_occupancy`.
    Charge {
        /// Largest representable charge magnitude.
        max_occupancy: u32,
    },
}

impl SiteKind {
    /// Physical dimension of the site.
    pub fn dim(&self) -> usize {
        match self {
            SiteKind::Fermion => 2,
            SiteKind::Charge { max_occupancy } => 2 * *max_occupancy as usize + 1,
        }
    }

    /// Physical index corresponding to `label`.
    pub fn index_of(&self, label: LocalLabel) -> Result<usize, PrepError> {
        match (self, label) {
            (SiteKind::Fermion, LocalLabel::Empty) => Ok(0),
            (SiteKind::Fermion, LocalLabel::Occupied) => Ok(1),
            (SiteKind::Charge { max_occupancy }, LocalLabel::Charge(n)) => {
                let max = *max_occupancy as i64;
                let n = n as i64;
                if n.abs() > max {
                    return Err(PrepError::InvalidInput(
                        ErrorInfo::new(
                            "charge-out-of-range",
                            "charge exceeds the charge site range",
                        )
                        .with_context("charge", n)
                        .with_context("max_occupancy", max),
                    ));
                }
                Ok((n + max) as usize)
            }
            (kind, label) => Err(PrepError::InvalidInput(
                ErrorInfo::new("label-kind-mismatch", "label does not belong to the site kind")
                    .with_context("kind", format!("{kind:?}"))
                    .with_context("label", label),
            )),
        }
    }

    /// Label corresponding to physical index `index`.
    pub fn label_of(&self, index: usize) -> Option<LocalLabel> {
        match self {
            SiteKind::Fermion => match index {
                0 => Some(LocalLabel::Empty),
                1 => Some(LocalLabel::Occupied),
                _ => None,
            },
            SiteKind::Charge { max_occupancy } => {
                let max = *max_occupancy as i64;
                let n = index as i64 - max;
                (n.abs() <= max).then_some(LocalLabel::Charge(n as i32))
            }
        }
    }

    /// Diagonal number operator eigenvalue for physical index `index`.
    pub fn number(&self, index: usize) -> f64 {
        match self {
            SiteKind::Fermion => index as f64,
            SiteKind::Charge { max_occupancy } => index as f64 - *max_occupancy as f64,
        }
    }
}

/// Index space a site belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteDomain {
    /// Position in the global chain.
    Global,
    /// Position in an isolated sub-problem solved on its own local basis.
    Sub,
}

/// Identity of one site: its domain, one-based position and local space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId {
    /// Index space of the position.
    pub domain: SiteDomain,
    /// One-based position within the domain.
    pub position: usize,
    /// Local Hilbert space.
    pub kind: SiteKind,
}

impl SiteId {
    /// Global fermionic site at `position`.
    pub fn global(position: usize, kind: SiteKind) -> Self {
        Self {
            domain: SiteDomain::Global,
            position,
            kind,
        }
    }

    /// Sub-domain site at `position`.
    pub fn sub(position: usize, kind: SiteKind) -> Self {
        Self {
            domain: SiteDomain::Sub,
            position,
            kind,
        }
    }

    /// Physical dimension of the site.
    pub fn dim(&self) -> usize {
        self.kind.dim()
    }
}

/// Consecutive sub-domain fermionic sites `1..=count`.
pub fn sub_fermions(count: usize) -> Vec<SiteId> {
    (1..=count)
        .map(|position| SiteId::sub(position, SiteKind::Fermion))
        .collect()
}
