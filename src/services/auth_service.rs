use bcrypt::{hash, verify};

use crate::errors::{ChatError, ChatResult};

/// Longest username the store accepts.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// bcrypt ignores everything past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Bounds bcrypt accepts for its work factor.
pub const MIN_HASH_COST: u32 = 4;
pub const MAX_HASH_COST: u32 = 31;

/// Password hashing and credential validation
pub struct AuthService;

impl AuthService {
    /// Hash a password using bcrypt
    pub fn hash_password(password: &str, cost: u32) -> ChatResult<String> {
        if password.is_empty() {
            return Err(ChatError::validation("password", "cannot be empty"));
        }

        if password.len() > MAX_PASSWORD_BYTES {
            return Err(ChatError::validation(
                "password",
                format!("is too long (max {} bytes)", MAX_PASSWORD_BYTES),
            ));
        }

        Ok(hash(password, cost)?)
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> ChatResult<bool> {
        Ok(verify(password, hash)?)
    }

    /// Usernames are 1-150 characters of letters, digits and `@ . + - _`
    pub fn validate_username(username: &str) -> ChatResult<()> {
        if username.is_empty() {
            return Err(ChatError::validation("username", "cannot be empty"));
        }

        if username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(ChatError::validation(
                "username",
                format!("is too long (max {} characters)", MAX_USERNAME_LENGTH),
            ));
        }

        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(ChatError::validation(
                "username",
                "can only contain letters, numbers and @/./+/-/_ characters",
            ));
        }

        Ok(())
    }
}
