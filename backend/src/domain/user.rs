//! User data model.
//!
//! Users carry exactly one [`Role`]; the role is changed only through the
//! account service, which gates the mutation on the capability matrix.
//! Plaintext passwords never persist — they are digested on the way in and
//! the digest is what the stores keep.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Role;

/// Validation errors returned by [`User::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    InvalidEmail,
    EmptyPassword,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain an @ sign"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SHA-256 digest of a user's password, hex-encoded.
///
/// The digest is the only credential form the stores ever see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Digest a plaintext password.
    pub fn derive(plaintext: &str) -> Self {
        Self(hex::encode(Sha256::digest(plaintext.as_bytes())))
    }

    /// Return `true` when `plaintext` digests to this value.
    pub fn matches(&self, plaintext: &str) -> bool {
        Self::derive(plaintext) == *self
    }
}

/// Domain user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_digest: PasswordDigest,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    /// Validate inputs and construct a user with a fresh id.
    ///
    /// The plaintext password is digested here; callers should zeroize their
    /// copy once this returns.
    pub fn try_new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
        role: Role,
        avatar_url: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let email = email.into();
        validate_name(&name)?;
        validate_email(&email)?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self {
            id: UserId::random(),
            name,
            email,
            password_digest: PasswordDigest::derive(password),
            role,
            avatar_url,
        })
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), UserValidationError> {
    if name.trim().is_empty() {
        return Err(UserValidationError::EmptyName);
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }
    if !email.contains('@') {
        return Err(UserValidationError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[test]
    fn digest_round_trips() {
        let digest = PasswordDigest::derive("s3cret");
        assert!(digest.matches("s3cret"));
        assert!(!digest.matches("other"));
    }

    #[test]
    fn digest_is_hex_encoded_sha256() {
        let digest = serde_json::to_value(PasswordDigest::derive("x")).expect("serializes");
        let raw = digest.as_str().expect("string digest");
        assert_eq!(raw.len(), 64);
        assert!(raw.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[rstest]
    #[case("", "a@b.c", "pw", UserValidationError::EmptyName)]
    #[case("Ada", "", "pw", UserValidationError::EmptyEmail)]
    #[case("Ada", "not-an-email", "pw", UserValidationError::InvalidEmail)]
    #[case("Ada", "a@b.c", "", UserValidationError::EmptyPassword)]
    fn construction_rejects_invalid_fields(
        #[case] name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: UserValidationError,
    ) {
        let result = User::try_new(name, email, password, Role::Contributor, None);
        assert_eq!(result.expect_err("invalid"), expected);
    }

    #[test]
    fn construction_digests_the_password() {
        let user = User::try_new("Ada", "ada@example.com", "pw", Role::Admin, None)
            .expect("valid user");
        assert!(user.password_digest.matches("pw"));
    }
}
