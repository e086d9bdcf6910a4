/// Password Hashing and Verification
///
/// bcrypt with a fresh salt per hash; the salt and cost travel inside the
/// resulting string.

use bcrypt::{hash, verify};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::AppError;

const DUMMY_PASSWORD: &str = "no account has this password";

lazy_static! {
    // one throwaway hash per bcrypt cost, computed on first use
    static ref DUMMY_HASHES: Mutex<HashMap<u32, String>> = Mutex::new(HashMap::new());
}

/// Cheapest cost bcrypt accepts; keeps test hashing fast
#[cfg(test)]
pub(crate) const TEST_BCRYPT_COST: u32 = 4;

/// Hash a password using bcrypt at the given cost
///
/// # Errors
/// Returns error if bcrypt rejects the cost or fails internally
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored bcrypt hash
///
/// A malformed hash counts as a mismatch rather than an error.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match verify(password, hashed_password) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            false
        }
    }
}

/// A real bcrypt hash at `cost` for lookup misses to verify against
///
/// Verifying against it costs as much as verifying against a stored hash of
/// the same cost. Computed once per cost and cached.
///
/// # Errors
/// Returns error if bcrypt rejects the cost
pub fn dummy_hash(cost: u32) -> Result<String, AppError> {
    let mut hashes = DUMMY_HASHES
        .lock()
        .map_err(|_| AppError::Internal("Dummy hash cache poisoned".to_string()))?;

    if let Some(existing) = hashes.get(&cost) {
        return Ok(existing.clone());
    }

    let fresh = hash_password(DUMMY_PASSWORD, cost)?;
    hashes.insert(cost, fresh.clone());
    Ok(fresh)
}
