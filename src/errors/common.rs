//! Conversion of domain errors into structured GraphQL errors

use async_graphql::{Error as GraphQLError, ErrorExtensions};

use super::ChatError;

/// Convert domain errors to GraphQL errors with error codes
pub trait ToGraphQLError {
    fn to_graphql_error(&self) -> GraphQLError;
}

impl ToGraphQLError for ChatError {
    fn to_graphql_error(&self) -> GraphQLError {
        let code = self.error_code();
        let message = self.to_string();

        GraphQLError::new(message).extend_with(|_, e| {
            e.set("code", code);

            match self {
                ChatError::UserNotFound(username) | ChatError::UsernameTaken(username) => {
                    e.set("username", username.as_str());
                }
                ChatError::ChatRoomExists(name) => {
                    e.set("roomName", name.as_str());
                }
                ChatError::Validation { field, .. } => {
                    e.set("field", *field);
                }
                _ => {}
            }
        })
    }
}

/// Extension trait for Result<T, ChatError> used by resolvers
pub trait ResultExt<T> {
    fn to_graphql_result(self) -> Result<T, GraphQLError>;
}

impl<T> ResultExt<T> for Result<T, ChatError> {
    fn to_graphql_result(self) -> Result<T, GraphQLError> {
        self.map_err(|e| {
            if !e.is_not_found() && !e.is_uniqueness_violation() && !e.is_validation_error() {
                tracing::error!("Request failed: {}", e);
            }
            e.to_graphql_error()
        })
    }
}
