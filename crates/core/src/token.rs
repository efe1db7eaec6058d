//! Session token generation.

use base64::Engine;
use rand::RngCore;

/// Generate a random session token using cryptographically secure RNG.
///
/// 32 random bytes, URL-safe base64 without padding. The token itself is the
/// session capability; only the cache entry keyed by it is held server-side.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
