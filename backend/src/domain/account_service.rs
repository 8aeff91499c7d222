//! Account service: authentication and user management.
//!
//! Credential checks are concentrated here so handlers only deal with
//! request/response mapping. Plaintext passwords are wrapped in
//! [`Zeroizing`] and survive only long enough to derive a digest.

use std::sync::Arc;

use serde_json::json;
use zeroize::Zeroizing;

use crate::domain::ports::{StorageError, UserRepository};
use crate::domain::user::{validate_email, validate_name};
use crate::domain::{
    Capability, Error, PasswordDigest, Role, User, UserId, UserValidationError,
};

/// Fields supplied when creating a user.
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub role: Role,
    pub avatar_url: Option<String>,
}

/// Partial update merged into a stored user.
#[derive(Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub role: Option<Role>,
    pub avatar_url: Option<String>,
}

/// Account use-cases over the user repository.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    /// Create a new service over the given repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Validate credentials and return the authenticated user.
    ///
    /// Unknown emails and wrong passwords produce the same error so the
    /// response does not reveal which part failed.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, Error> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_storage_error)?;
        match user {
            Some(user) if user.password_digest.matches(password) => Ok(user),
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }

    /// Resolve a session user id back to its record.
    pub async fn lookup(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_storage_error)
    }

    /// List every user. Management surface only.
    pub async fn list(&self, actor: &User) -> Result<Vec<User>, Error> {
        require_capability(actor, Capability::ManageUsers)?;
        self.users.list().await.map_err(map_storage_error)
    }

    /// Fetch a single profile: one's own, or any with `ManageUsers`.
    pub async fn get(&self, actor: &User, id: &UserId) -> Result<User, Error> {
        if actor.id != *id {
            require_capability(actor, Capability::ManageUsers)?;
        }
        self.fetch(id).await
    }

    /// Create a user account.
    pub async fn create(&self, actor: &User, new: NewUser) -> Result<User, Error> {
        require_capability(actor, Capability::ManageUsers)?;
        self.ensure_email_free(&new.email, None).await?;
        let user = User::try_new(
            new.name,
            new.email,
            &new.password,
            new.role,
            new.avatar_url,
        )
        .map_err(map_validation_error)?;
        self.users.save(&user).await.map_err(map_storage_error)?;
        Ok(user)
    }

    /// Merge `changes` into an existing user.
    ///
    /// Requires `EditAnyProfile`; non-admins get a read-only view of their
    /// own profile and cannot edit even that.
    pub async fn update(
        &self,
        actor: &User,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<User, Error> {
        require_capability(actor, Capability::EditAnyProfile)?;
        let mut user = self.fetch(id).await?;
        if let Some(email) = changes.email {
            validate_email(&email).map_err(map_validation_error)?;
            if email != user.email {
                self.ensure_email_free(&email, Some(id)).await?;
            }
            user.email = email;
        }
        if let Some(name) = changes.name {
            validate_name(&name).map_err(map_validation_error)?;
            user.name = name;
        }
        if let Some(password) = changes.password {
            if password.is_empty() {
                return Err(map_validation_error(UserValidationError::EmptyPassword));
            }
            user.password_digest = PasswordDigest::derive(&password);
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(avatar_url) = changes.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        self.users.save(&user).await.map_err(map_storage_error)?;
        Ok(user)
    }

    /// Delete a user account.
    pub async fn delete(&self, actor: &User, id: &UserId) -> Result<(), Error> {
        require_capability(actor, Capability::ManageUsers)?;
        let removed = self.users.delete(id).await.map_err(map_storage_error)?;
        if !removed {
            return Err(Error::not_found(format!("no user with id {id}")));
        }
        Ok(())
    }

    async fn fetch(&self, id: &UserId) -> Result<User, Error> {
        self.lookup(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("no user with id {id}")))
    }

    async fn ensure_email_free(
        &self,
        email: &str,
        updating: Option<&UserId>,
    ) -> Result<(), Error> {
        let existing = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_storage_error)?;
        match existing {
            Some(user) if Some(&user.id) != updating => {
                Err(Error::invalid_request(format!(
                    "a user with email {email} already exists"
                ))
                .with_details(json!({ "field": "email", "code": "duplicate_email" })))
            }
            _ => Ok(()),
        }
    }
}

fn require_capability(actor: &User, capability: Capability) -> Result<(), Error> {
    if actor.role.has_capability(capability) {
        return Ok(());
    }
    Err(Error::forbidden(format!(
        "role {} may not manage user accounts",
        actor.role
    )))
}

fn map_storage_error(error: StorageError) -> Error {
    Error::storage(error.to_string())
}

fn map_validation_error(error: UserValidationError) -> Error {
    let field = match error {
        UserValidationError::EmptyName => "name",
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
        UserValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
