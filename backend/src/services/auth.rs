//! Authentication service for user registration and login

use bcrypt::{hash, verify};

use shared::{validate_password, validate_required, validate_username, RegisterUserInput, UserAccount};

use crate::error::{AppError, AppResult};
use crate::store::Store;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Store,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Store, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Register a new account
    pub fn register(&self, input: RegisterUserInput) -> AppResult<UserAccount> {
        validate_required(&input.name).map_err(|m| AppError::validation("name", m))?;
        validate_username(&input.username).map_err(|m| AppError::validation("username", m))?;
        validate_password(&input.password).map_err(|m| AppError::validation("password", m))?;

        let password_hash = hash(&input.password, self.bcrypt_cost)?;
        let user = self
            .store
            .add_user(&input.name, &input.username, password_hash, input.profile)?;

        Ok(UserAccount::from(&user))
    }

    /// Authenticate with username and password
    pub fn authenticate(&self, username: &str, password: &str) -> AppResult<UserAccount> {
        let user = self
            .store
            .find_user_by_username(username)?
            .ok_or(AppError::InvalidCredentials)?;

        // Verify password
        if !verify(password, &user.password_hash)? {
            tracing::warn!(username, "Rejected login attempt");
            return Err(AppError::InvalidCredentials);
        }

        tracing::debug!(user_id = user.id, "User authenticated");
        Ok(UserAccount::from(&user))
    }
}
