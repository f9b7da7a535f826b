//! Even/odd minimisation of the capacitive charging energy `Ec (n - Ng)^2`.

use meso_core::errors::{ErrorInfo, PrepError};
use meso_core::Parity;
use serde::{Deserialize, Serialize};

fn default_max_occupancy() -> i64 {
    2
}

fn default_ec() -> f64 {
    0.0
}

fn default_ng() -> f64 {
    0.0
}

/// Parameters of the capacitive charging model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargingParams {
    /// Largest charge magnitude searched, and the range of the capacitance site.
    #[serde(default = "default_max_occupancy")]
    pub max_occupancy: i64,
    /// Charging energy scale.
    #[serde(default = "default_ec")]
    pub ec: f64,
    /// Gate-induced offset charge.
    #[serde(default = "default_ng")]
    pub ng: f64,
}

impl Default for ChargingParams {
    fn default() -> Self {
        Self {
            max_occupancy: default_max_occupancy(),
            ec: default_ec(),
            ng: default_ng(),
        }
    }
}

/// Lowest charging energy within one parity class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeSectorEnergy {
    /// Parity of `charge`.
    pub parity: Parity,
    /// Minimising integer charge.
    pub charge: i64,
    /// `Ec (charge - Ng)^2`.
    pub energy: f64,
}

/// Best even and best odd charge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargingOptimum {
    /// Minimum over even charges.
    pub even: ChargeSectorEnergy,
    /// Minimum over odd charges.
    pub odd: ChargeSectorEnergy,
}

impl ChargingOptimum {
    /// `(even_energy, odd_energy, n_even, n_odd)`.
    pub fn as_tuple(&self) -> (f64, f64, i64, i64) {
        (self.even.energy, self.odd.energy, self.even.charge, self.odd.charge)
    }

    /// Optimum of the given parity class.
    pub fn sector(&self, parity: Parity) -> &ChargeSectorEnergy {
        match parity {
            Parity::Even => &self.even,
            Parity::Odd => &self.odd,
        }
    }
}

/// Charging energy of charge `n`.
pub fn charging_energy(ec: f64, ng: f64, n: i64) -> f64 {
    let diff = n as f64 - ng;
    ec * diff * diff
}

/// Charges `0, 1, -1, 2, -2, ..., max, -max` in search order.
pub fn candidate_charges(max_occupancy: i64) -> impl Iterator<Item = i64> {
    std::iter::once(0).chain((1..=max_occupancy.max(0)).flat_map(|n| [n, -n]))
}

/// Finds the lowest-energy even and odd charges in `-max_occupancy..=max_occupancy`.
///
/// Candidates are visited in the order of [`candidate_charges`] and a later
/// candidate only replaces the current best if it is strictly lower, so ties
/// resolve to the charge of smallest magnitude, positive before negative.
pub fn best_sectors(max_occupancy: i64, ec: f64, ng: f64) -> Result<ChargingOptimum, PrepError> {
    if !ec.is_finite() || !ng.is_finite() {
        return Err(PrepError::InvalidInput(
            ErrorInfo::new("non-finite-charging", "Ec and Ng must be finite")
                .with_context("ec", ec)
                .with_context("ng", ng),
        ));
    }
    if max_occupancy < 1 {
        return Err(PrepError::EmptyDomain(
            ErrorInfo::new("empty-charge-domain", "no odd charge lies within the search range")
                .with_context("max_occupancy", max_occupancy)
                .with_hint("max_occupancy must be at least 1"),
        ));
    }
    let mut even: Option<ChargeSectorEnergy> = None;
    let mut odd: Option<ChargeSectorEnergy> = None;
    for n in candidate_charges(max_occupancy) {
        let parity = Parity::of(n);
        let energy = charging_energy(ec, ng, n);
        let slot = match parity {
            Parity::Even => &mut even,
            Parity::Odd => &mut odd,
        };
        if slot.map_or(true, |best| energy < best.energy) {
            *slot = Some(ChargeSectorEnergy {
                parity,
                charge: n,
                energy,
            });
        }
    }
    match (even, odd) {
        (Some(even), Some(odd)) => Ok(ChargingOptimum { even, odd }),
        _ => Err(PrepError::EmptyDomain(
            ErrorInfo::new("empty-charge-domain", "a parity class has no candidate")
                .with_context("max_occupancy", max_occupancy),
        )),
    }
}
