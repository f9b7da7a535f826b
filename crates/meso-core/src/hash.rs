//! Canonical hashing helpers for report artefacts.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, PrepError};

/// Serialises the payload to canonical JSON bytes.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, PrepError> {
    let json = serde_json::to_value(value)
        .map_err(|err| PrepError::Serde(ErrorInfo::new("serialize", err.to_string())))?;
    serde_json::to_vec(&json)
        .map_err(|err| PrepError::Serde(ErrorInfo::new("serialize", err.to_string())))
}

/// Computes a stable hexadecimal hash for the provided serialisable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, PrepError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

/// Rounds a floating point value to the precision recorded in reports.
pub fn round_f64(value: f64) -> f64 {
    let scaled = (value * 1e9).round();
    scaled / 1e9
}
