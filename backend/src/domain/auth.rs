//! Authentication primitives: registration and login payloads.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, UserValidationError, Username};

/// Minimum password length, counted in characters.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when registration or login values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// One or more required fields were missing or blank.
    MissingFields,
    /// Password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Email or username failed validation.
    User(UserValidationError),
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Missing required fields"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::User(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised (trimmed, lower-cased).
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" A@X.com ", "secret1").unwrap();
/// assert_eq!(creds.email().as_ref(), "a@x.com");
/// assert_eq!(creds.password(), "secret1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CredentialsValidationError::MissingFields);
        }
        Ok(Self {
            email: Email::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email the caller logs in with.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Clone the password into a buffer wiped on drop.
    pub fn password_buffer(&self) -> Zeroizing<String> {
        self.password.clone()
    }
}

/// Validated account registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    username: Username,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a registration payload.
    ///
    /// Missing fields are reported before password strength so the caller sees
    /// the same message regardless of which field was omitted.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        if email.trim().is_empty() || username.trim().is_empty() || password.is_empty() {
            return Err(CredentialsValidationError::MissingFields);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            email: Email::new(email)?,
            username: Username::new(username)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email to register.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Username to register.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Clone the password into a buffer wiped on drop.
    pub fn password_buffer(&self) -> Zeroizing<String> {
        self.password.clone()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw")]
    #[case("   ", "pw")]
    #[case("a@x.com", "")]
    fn login_requires_both_fields(#[case] email: &str, #[case] password: &str) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, CredentialsValidationError::MissingFields);
    }

    #[rstest]
    fn login_normalises_email_and_keeps_password_whitespace() {
        let creds = LoginCredentials::try_from_parts("  Ada@X.com", " secret ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.email().as_ref(), "ada@x.com");
        assert_eq!(creds.password(), " secret ");
    }

    #[rstest]
    #[case("", "a", "secret1", CredentialsValidationError::MissingFields)]
    #[case("a@x.com", "  ", "secret1", CredentialsValidationError::MissingFields)]
    #[case("a@x.com", "a", "", CredentialsValidationError::MissingFields)]
    #[case(
        "a@x.com",
        "a",
        "12345",
        CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN }
    )]
    #[case(
        "not-an-email",
        "a",
        "secret1",
        CredentialsValidationError::User(UserValidationError::InvalidEmail)
    )]
    fn registration_rejects_invalid_payloads(
        #[case] email: &str,
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Registration::try_from_parts(email, username, password)
            .expect_err("invalid registration must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("123456")]
    #[case("ééééé\u{e9}")]
    fn registration_accepts_six_character_passwords(#[case] password: &str) {
        let registration = Registration::try_from_parts("A@X.COM", " a ", password)
            .expect("valid registration");
        assert_eq!(registration.email().as_ref(), "a@x.com");
        assert_eq!(registration.username().as_ref(), "a");
        assert_eq!(registration.password_buffer().as_str(), password);
    }
}
