#![deny(missing_docs)]
#![doc = "Segment bases, placement policies and the partitioned global orbital ordering."]

/// Registration of segments and the global ordering.
pub mod manager;
/// Single-particle orbitals of one segment.
pub mod orbital;
/// Placement policies for the global ordering.
pub mod placement;
/// Diagonalisation of quadratic segment Hamiltonians.
pub mod tight_binding;

pub use manager::{GlobalOrdering, PartitionedBasisManager};
pub use orbital::{Orbital, SegmentBasis};
pub use placement::{PlacementPolicy, PlacementSpec, ScattererCentered, Sequential, Side};
pub use tight_binding::{from_hamiltonian, uniform_chain};
