//! One-way salted password hashing.
//!
//! Hashes are Argon2id PHC strings. Hashing is CPU bound; callers on an async
//! executor should go through [`hash_off_thread`] and [`verify_off_thread`].

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use zeroize::Zeroizing;

use super::{Error, TraceId};

/// Failures raised while producing or parsing a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hasher rejected the input or parameters.
    #[error("password hashing failed: {0}")]
    Hashing(String),
    /// A stored value is not a PHC string.
    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
}

/// Argon2id hash in PHC string form.
///
/// `Debug` output is redacted so hashes never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::PasswordHash;
    ///
    /// let hash = PasswordHash::generate("secret1").unwrap();
    /// assert!(hash.verify("secret1"));
    /// assert!(!hash.verify("secret2"));
    /// ```
    pub fn generate(password: &str) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| PasswordHashError::Hashing(err.to_string()))
    }

    /// Accept a PHC string loaded from storage.
    pub fn from_phc(value: impl Into<String>) -> Result<Self, PasswordHashError> {
        let value = value.into();
        password_hash::PasswordHash::new(&value)
            .map_err(|err| PasswordHashError::Malformed(err.to_string()))?;
        Ok(Self(value))
    }

    /// Return `true` when `password` matches this hash.
    pub fn verify(&self, password: &str) -> bool {
        let Ok(parsed) = password_hash::PasswordHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// PHC string suitable for persistence.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Hash on the blocking pool, keeping the caller's trace identifier in scope.
pub async fn hash_off_thread(password: Zeroizing<String>) -> Result<PasswordHash, Error> {
    let trace_id = TraceId::current();
    let joined = tokio::task::spawn_blocking(move || {
        let work = || PasswordHash::generate(password.as_str());
        match trace_id {
            Some(id) => TraceId::sync_scope(id, work),
            None => work(),
        }
    })
    .await;

    match joined {
        Ok(result) => result.map_err(|err| Error::internal(err.to_string())),
        Err(err) => Err(Error::internal(format!("password hashing task failed: {err}"))),
    }
}

/// Verify on the blocking pool.
pub async fn verify_off_thread(hash: PasswordHash, password: Zeroizing<String>) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || hash.verify(password.as_str()))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}
