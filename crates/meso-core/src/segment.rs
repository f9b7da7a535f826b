//! Identifiers for the physical segments of the device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, PrepError};

/// Physically distinct part of the device.
///
/// The ordering of the variants is the registration order used by reports
/// (`L`, `R`, `S`, `C`), not the placement order of the global basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SegmentId {
    /// Left normal-metal lead.
    #[serde(rename = "L")]
    LeftLead,
    /// Right normal-metal lead.
    #[serde(rename = "R")]
    RightLead,
    /// Central scatterer, possibly superconducting.
    #[serde(rename = "S")]
    Scatterer,
    /// Single auxiliary mode tracking the total device charge.
    #[serde(rename = "C")]
    Capacitance,
}

impl SegmentId {
    /// All segments in report order.
    pub const ALL: [SegmentId; 4] = [
        SegmentId::LeftLead,
        SegmentId::RightLead,
        SegmentId::Scatterer,
        SegmentId::Capacitance,
    ];

    /// The two lead segments.
    pub const LEADS: [SegmentId; 2] = [SegmentId::LeftLead, SegmentId::RightLead];

    /// Short name used in tables and configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentId::LeftLead => "L",
            SegmentId::RightLead => "R",
            SegmentId::Scatterer => "S",
            SegmentId::Capacitance => "C",
        }
    }

    /// Returns `true` for the two normal-metal leads.
    pub fn is_lead(&self) -> bool {
        matches!(self, SegmentId::LeftLead | SegmentId::RightLead)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentId {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(SegmentId::LeftLead),
            "R" => Ok(SegmentId::RightLead),
            "S" => Ok(SegmentId::Scatterer),
            "C" => Ok(SegmentId::Capacitance),
            other => Err(PrepError::UnknownLocation(
                ErrorInfo::new("unknown-segment", "segment name is not one of L, R, S, C")
                    .with_context("segment", other),
            )),
        }
    }
}
