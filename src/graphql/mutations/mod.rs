use async_graphql::*;

use crate::errors::ResultExt;
use crate::graphql::context::GraphQLContext;
use crate::graphql::types::{CreateMessagePayload, CreateUserPayload, Message, User};
use crate::services::NewUser;

pub struct Mutation;

#[Object]
impl Mutation {
    /// Register a new user
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
        email: Option<String>,
    ) -> Result<CreateUserPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let user = context
            .chat_service
            .create_user(NewUser {
                username,
                password,
                email,
            })
            .await
            .to_graphql_result()?;

        Ok(CreateUserPayload {
            user: User::from(user),
        })
    }

    /// Post a message, creating the chat room on first use
    async fn create_message(
        &self,
        ctx: &Context<'_>,
        username: String,
        room_name: String,
        content: String,
    ) -> Result<CreateMessagePayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let message = context
            .chat_service
            .create_message(&username, &room_name, &content)
            .await
            .to_graphql_result()?;

        Ok(CreateMessagePayload {
            message: Message::from(message),
        })
    }
}
