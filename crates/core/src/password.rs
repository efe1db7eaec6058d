//! Password hashing.
//!
//! Passwords are stored as a single unsalted round of SHA-256, hex encoded.
//! WARNING: this scheme is weak by modern standards (no salt, no work
//! factor). It is kept for compatibility with existing credential rows;
//! deployments without that constraint should migrate to a salted, iterated
//! hash. The `InvalidCredentials` contract is independent of the hash choice.

use sha2::{Digest, Sha256};

/// Hash a password for storage.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Check a plaintext password against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}
