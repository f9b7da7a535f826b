#![deny(missing_docs)]
#![doc = "Matrix product state representation of prepared device states."]

/// Open-boundary matrix product states.
pub mod mps;
/// Site identities and local Hilbert spaces.
pub mod site;
/// Per-site tensors.
pub mod tensor;

pub use mps::{Mps, TruncationOpts};
pub use site::{sub_fermions, SiteDomain, SiteId, SiteKind};
pub use tensor::SiteTensor;
