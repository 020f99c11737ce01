//! Account service: registration, login, and profile lookup.
//!
//! Plaintext passwords only ever live in zeroised buffers and are hashed or
//! verified on the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::password::{hash_off_thread, verify_off_thread};
use crate::domain::ports::{LoginService, RegistrationService, UserProfileQuery, UserRepository};
use crate::domain::repository_errors::{ACCOUNT_CONFLICT_MESSAGE, map_user_error};
use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Account service implementing the registration, login, and profile ports.
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    /// Build the service over a user store and clock.
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

#[async_trait]
impl<U: UserRepository> RegistrationService for AccountService<U> {
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let taken = self
            .users
            .email_or_username_taken(registration.email(), registration.username())
            .await
            .map_err(map_user_error)?;
        if taken {
            debug!("registration refused: email or username in use");
            return Err(Error::conflict(ACCOUNT_CONFLICT_MESSAGE));
        }

        let password_hash = hash_off_thread(registration.password_buffer()).await?;
        let user = User::register(
            UserId::random(),
            registration.email().clone(),
            registration.username().clone(),
            self.clock.utc(),
        );
        self.users
            .create(&user, &password_hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<U: UserRepository> LoginService for AccountService<U> {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let matches = verify_off_thread(stored.password_hash, credentials.password_buffer()).await?;
        if !matches {
            debug!(user_id = %stored.user.id(), "password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }
        Ok(stored.user.id().clone())
    }
}

#[async_trait]
impl<U: UserRepository> UserProfileQuery for AccountService<U> {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}
