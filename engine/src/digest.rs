//! Content hashes for simulation states.
//!
//! Two runs that should be identical (live vs. replayed, or two replays of the same
//! recording) can be compared frame by frame through these digests instead of
//! diffing whole states.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::TimeMachine;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 of the state's canonical JSON encoding.
pub fn state_digest<S: Serialize>(state: &S) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(state)?;
    Ok(sha256_hex(&bytes))
}

/// One digest per recorded frame.
pub fn history_digests<S: Serialize>(tm: &TimeMachine<S>) -> Result<Vec<String>, serde_json::Error> {
    tm.history().iter().map(state_digest).collect()
}

/// Index of the first frame whose digest differs, if any. A length mismatch counts as a
/// divergence at the shorter length.
pub fn first_divergence(a: &[String], b: &[String]) -> Option<usize> {
    let common = a.len().min(b.len());
    (0..common)
        .find(|&i| a[i] != b[i])
        .or_else(|| (a.len() != b.len()).then_some(common))
}
