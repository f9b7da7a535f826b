//! Configuration-driven preparation.

use meso_basis::PartitionedBasisManager;
use meso_core::errors::{ErrorInfo, PrepError};
use meso_solve::ExactDiagonalization;
use tracing::info;

use crate::alternating::alternating_filling;
use crate::composer::GroundStateComposer;
use crate::config::{InitialStateSpec, PrepConfig};
use crate::report::CompositionReport;
use crate::state::GlobalState;

/// Basis and state produced from a configuration.
#[derive(Debug, Clone)]
pub struct Preparation {
    /// Finalised basis.
    pub basis: PartitionedBasisManager,
    /// Prepared global state.
    pub state: GlobalState,
    /// Composition report; absent for alternating fillings.
    pub report: Option<CompositionReport>,
}

/// Builds the basis and prepares the configured initial state with the exact solver.
pub fn prepare(config: &PrepConfig) -> Result<Preparation, PrepError> {
    let basis = config.build_basis()?;
    info!(
        orbitals = basis.num_orbitals(),
        policy = basis.ordering()?.policy(),
        "basis finalised"
    );
    match config.initial_state {
        InitialStateSpec::GroundState => {
            let composition = GroundStateComposer::new(&basis, ExactDiagonalization::new())
                .compose(&config.compose_options())?;
            Ok(Preparation {
                basis,
                state: composition.state,
                report: Some(composition.report),
            })
        }
        InitialStateSpec::Alternating { particles } => {
            let max_occupancy = u32::try_from(config.charging.max_occupancy).map_err(|_| {
                PrepError::EmptyDomain(
                    ErrorInfo::new("empty-charge-domain", "max_occupancy must be non-negative")
                        .with_context("max_occupancy", config.charging.max_occupancy),
                )
            })?;
            let state = alternating_filling(&basis, particles, max_occupancy)?;
            Ok(Preparation {
                basis,
                state,
                report: None,
            })
        }
    }
}
