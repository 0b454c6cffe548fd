//! Domain error types for the chat service
//!
//! Resolvers never build GraphQL errors by hand: services return
//! [`ChatError`] and the resolver layer converts it with
//! [`ToGraphQLError`], which attaches a stable `code` extension.
//!
//! # Error Categories
//!
//! - **NOT_FOUND**: a referenced user does not exist
//! - **UNIQUENESS_VIOLATION**: duplicate username or room name
//! - **VALIDATION_FAILED**: malformed mutation arguments
//! - **INTERNAL_ERROR**: hashing or store failures
//!
//! A room that does not exist is not an error for read queries; those
//! return an empty list instead.
//!
//! # Examples
//!
//! ```rust
//! use chatroom::errors::ChatError;
//!
//! let err = ChatError::UserNotFound("alice".to_string());
//! assert_eq!(err.error_code(), "NOT_FOUND");
//! assert!(err.is_not_found());
//! ```

pub mod common;

pub use common::{ResultExt, ToGraphQLError};

use thiserror::Error;

/// Errors produced by chat store operations
#[derive(Error, Debug)]
pub enum ChatError {
    /// No user with the given username
    #[error("User '{0}' not found")]
    UserNotFound(String),

    /// Username already registered
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    /// A concurrent insert claimed the room name but the row cannot be read back
    #[error("Chat room '{0}' already exists")]
    ChatRoomExists(String),

    /// Argument failed validation
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Failed to hash password: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ChatError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ChatError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ChatError::UserNotFound(_))
    }

    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(
            self,
            ChatError::UsernameTaken(_) | ChatError::ChatRoomExists(_)
        )
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, ChatError::Validation { .. })
    }

    /// Stable code exposed to API callers
    pub fn error_code(&self) -> &'static str {
        if self.is_not_found() {
            "NOT_FOUND"
        } else if self.is_uniqueness_violation() {
            "UNIQUENESS_VIOLATION"
        } else if self.is_validation_error() {
            "VALIDATION_FAILED"
        } else {
            "INTERNAL_ERROR"
        }
    }
}

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;
