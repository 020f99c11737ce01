//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new account.
    ///
    /// Fails with `conflict` when the email or the username is already in
    /// use; the message does not say which.
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}
