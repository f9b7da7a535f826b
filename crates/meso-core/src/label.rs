//! Discrete local basis labels and charge parity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Product-state label assigned to one global position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalLabel {
    /// Fermionic orbital without a particle.
    Empty,
    /// Fermionic orbital holding one particle.
    Occupied,
    /// Explicit integer charge of the capacitance mode.
    Charge(i32),
}

impl LocalLabel {
    /// Occupation number contributed by a fermionic label.
    pub fn occupation(&self) -> Option<u32> {
        match self {
            LocalLabel::Empty => Some(0),
            LocalLabel::Occupied => Some(1),
            LocalLabel::Charge(_) => None,
        }
    }

    /// Label of a fermionic orbital given its occupation.
    pub fn from_occupied(occupied: bool) -> Self {
        if occupied {
            LocalLabel::Occupied
        } else {
            LocalLabel::Empty
        }
    }
}

impl fmt::Display for LocalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalLabel::Empty => f.write_str("Emp"),
            LocalLabel::Occupied => f.write_str("Occ"),
            LocalLabel::Charge(n) => write!(f, "{n}"),
        }
    }
}

/// Even or odd total-charge parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Parity {
    /// Even number of charges.
    Even,
    /// Odd number of charges.
    Odd,
}

impl Parity {
    /// Parity of an integer, with negative odd numbers classified as odd.
    pub fn of(n: i64) -> Self {
        if n.rem_euclid(2) == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::Even => f.write_str("even"),
            Parity::Odd => f.write_str("odd"),
        }
    }
}
