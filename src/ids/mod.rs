//! Record id generation for the API-facing create path.
//!
//! Ids are 16 lowercase hex characters drawn from the OS random source.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes per id.
const ID_BYTES: usize = 8;

/// Generate a new opaque record id.
///
/// Falls back to the current time in nanoseconds if the OS random source is
/// unavailable. Fallback ids can collide under concurrent calls within the
/// same clock tick, so the fallback is logged.
pub fn generate_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    let filled = OsRng.try_fill_bytes(&mut bytes);
    id_from(filled, &bytes)
}

/// Hex-encode `bytes` if the random fill succeeded, else use the clock.
fn id_from(filled: Result<(), rand::Error>, bytes: &[u8]) -> String {
    match filled {
        Ok(()) => hex::encode(bytes),
        Err(e) => {
            tracing::warn!("OS random source failed, using timestamp id: {}", e);
            timestamp_id()
        }
    }
}

fn timestamp_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
        .to_string()
}
