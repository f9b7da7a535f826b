//! Placement policies mapping segment sizes to a global orbital permutation.

use std::collections::BTreeMap;

use meso_core::SegmentId;
use serde::{Deserialize, Serialize};

/// Pure function from segment sizes to an ordered list of `(segment, local index)`.
///
/// Implementations must not inspect energies: the permutation depends on the
/// segment sizes only, so alternative placements are swappable without
/// touching index translation. Coverage is verified by the manager.
pub trait PlacementPolicy: Send + Sync {
    /// Short identifier recorded in reports.
    fn name(&self) -> &str;

    /// Returns the global order; position `p` (one-based) is element `p - 1`.
    fn place(&self, sizes: &BTreeMap<SegmentId, usize>) -> Vec<(SegmentId, usize)>;
}

/// Which end of the scatterer block the capacitance orbital touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    /// Between the left lead and the scatterer.
    #[default]
    Left,
    /// Between the scatterer and the right lead.
    Right,
}

/// Scatterer block in the middle, leads on the flanks, capacitance adjacent to the block.
///
/// The left lead is mirrored so that orbital 1 of each lead sits next to the
/// central region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScattererCentered {
    /// End of the scatterer block that receives the capacitance orbital.
    pub capacitance_side: Side,
}

fn run(
    segment: SegmentId,
    sizes: &BTreeMap<SegmentId, usize>,
) -> impl DoubleEndedIterator<Item = (SegmentId, usize)> {
    let len = sizes.get(&segment).copied().unwrap_or(0);
    (1..=len).map(move |k| (segment, k))
}

impl PlacementPolicy for ScattererCentered {
    fn name(&self) -> &str {
        match self.capacitance_side {
            Side::Left => "scatterer-centered-left",
            Side::Right => "scatterer-centered-right",
        }
    }

    fn place(&self, sizes: &BTreeMap<SegmentId, usize>) -> Vec<(SegmentId, usize)> {
        let mut order: Vec<_> = run(SegmentId::LeftLead, sizes).rev().collect();
        if self.capacitance_side == Side::Left {
            order.extend(run(SegmentId::Capacitance, sizes));
        }
        order.extend(run(SegmentId::Scatterer, sizes));
        if self.capacitance_side == Side::Right {
            order.extend(run(SegmentId::Capacitance, sizes));
        }
        order.extend(run(SegmentId::RightLead, sizes));
        order
    }
}

/// Segments concatenated in a fixed order, each in local order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequential {
    /// Segment order along the chain.
    pub order: Vec<SegmentId>,
}

impl Default for Sequential {
    fn default() -> Self {
        Self {
            order: vec![
                SegmentId::LeftLead,
                SegmentId::Scatterer,
                SegmentId::Capacitance,
                SegmentId::RightLead,
            ],
        }
    }
}

impl PlacementPolicy for Sequential {
    fn name(&self) -> &str {
        "sequential"
    }

    fn place(&self, sizes: &BTreeMap<SegmentId, usize>) -> Vec<(SegmentId, usize)> {
        self.order
            .iter()
            .flat_map(|&segment| run(segment, sizes))
            .collect()
    }
}

/// Configuration-level selection of a placement policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum PlacementSpec {
    /// See [`ScattererCentered`].
    ScattererCentered {
        /// End of the scatterer block receiving the capacitance orbital.
        #[serde(default)]
        capacitance_side: Side,
    },
    /// See [`Sequential`].
    Sequential {
        /// Segment order along the chain.
        order: Vec<SegmentId>,
    },
}

impl Default for PlacementSpec {
    fn default() -> Self {
        PlacementSpec::ScattererCentered {
            capacitance_side: Side::Left,
        }
    }
}

impl PlacementSpec {
    /// Instantiates the selected policy.
    pub fn build(&self) -> Box<dyn PlacementPolicy> {
        match self {
            PlacementSpec::ScattererCentered { capacitance_side } => Box::new(ScattererCentered {
                capacitance_side: *capacitance_side,
            }),
            PlacementSpec::Sequential { order } => Box::new(Sequential {
                order: order.clone(),
            }),
        }
    }
}
