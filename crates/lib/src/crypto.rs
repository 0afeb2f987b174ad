//! Password hashing for accounts
//!
//! Argon2id with the crate's default (memory-hard) parameters. Each password
//! gets a fresh random salt; the salt is stored next to the PHC-format hash so
//! a record can be checked against the salt it claims to use.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core},
};

/// Salt string length for Argon2 (base64 encoded, 22 chars)
pub const SALT_LENGTH: usize = 22;

/// Errors from hashing a password.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Password hashing failed: {reason}")]
    HashingFailed { reason: String },
}

/// A stored password: PHC-format Argon2 hash plus the salt it was derived with.
#[derive(Clone, PartialEq, Eq)]
pub struct HashAndSalt {
    pub hash: String,
    pub salt: String,
}

impl std::fmt::Debug for HashAndSalt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashAndSalt").finish_non_exhaustive()
    }
}

/// Hash `password` with a newly generated random salt.
pub fn generate_hash_and_salt(password: impl AsRef<str>) -> Result<HashAndSalt, CryptoError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| CryptoError::HashingFailed {
            reason: e.to_string(),
        })?
        .to_string();

    Ok(HashAndSalt {
        hash,
        salt: salt.as_str().to_string(),
    })
}

/// Check `password` against a stored hash and salt.
///
/// Returns `false` for a wrong password and for a malformed record, including
/// one whose hash was not derived from the stored salt. The digest comparison
/// inside the verifier is constant time.
pub fn check_password(password: impl AsRef<str>, stored: &HashAndSalt) -> bool {
    let Ok(parsed) = PasswordHash::new(&stored.hash) else {
        return false;
    };
    if parsed.salt.map(|salt| salt.as_str()) != Some(stored.salt.as_str()) {
        return false;
    }
    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed)
        .is_ok()
}
