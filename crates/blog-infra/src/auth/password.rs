//! Hashing of account passwords.
//!
//! `AccountService` stores the output in `users.password_hash` at sign-up and
//! checks login attempts against it. `blogctl create-user` goes through the
//! same path.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use blog_core::ports::{AuthError, PasswordService};

/// Argon2id with the crate's default cost parameters.
///
/// Output is a PHC string (`$argon2id$v=19$...`) carrying its own salt and
/// parameters, so stored hashes stay verifiable if the defaults change.
#[derive(Default)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// A wrong password is `Ok(false)`; only an unreadable stored hash errors.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let stored = PasswordHash::new(hash).map_err(|e| {
            tracing::error!(error = %e, "Stored password hash is not a PHC string");
            AuthError::HashingError(e.to_string())
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &stored)
            .is_ok())
    }
}
