#![deny(missing_docs)]
#![doc = "Shared error, segment, label and hashing types for mesoscopic initial-state preparation."]

pub mod errors;
pub mod hash;
pub mod label;
pub mod segment;

pub use errors::{ErrorInfo, PrepError};
pub use hash::{round_f64, stable_hash_string, to_canonical_json_bytes};
pub use label::{LocalLabel, Parity};
pub use segment::SegmentId;
