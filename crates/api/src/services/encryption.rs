//! Identifiers and one-way hashes.
//!
//! Hashes use Argon2id with a random salt and are stored as PHC strings, so
//! the algorithm parameters and salt travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;

/// A fresh random (v4) UUID in hyphenated form.
pub fn gen_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Hash `text` with Argon2id and a random salt.
pub fn gen_hash(text: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(text.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Whether `text` matches the PHC-formatted `hash`.
///
/// A malformed hash is an error; a mismatch is `Ok(false)`.
pub fn compare_hash(text: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(text.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
