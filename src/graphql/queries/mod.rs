use async_graphql::*;

use crate::errors::ResultExt;
use crate::graphql::context::GraphQLContext;
use crate::graphql::types::{ChatRoom, Message, User};

pub struct Query;

#[Object]
impl Query {
    /// Get all users
    async fn all_users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let users = context.chat_service.list_users().await.to_graphql_result()?;

        Ok(users.into_iter().map(User::from).collect())
    }

    /// Get all chat rooms
    async fn all_chat_rooms(&self, ctx: &Context<'_>) -> Result<Vec<ChatRoom>> {
        let context = ctx.data::<GraphQLContext>()?;
        let chat_rooms = context
            .chat_service
            .list_chat_rooms()
            .await
            .to_graphql_result()?;

        Ok(chat_rooms.into_iter().map(ChatRoom::from).collect())
    }

    /// Get all messages with their user and chat room
    async fn all_messages(&self, ctx: &Context<'_>) -> Result<Vec<Message>> {
        let context = ctx.data::<GraphQLContext>()?;
        let messages = context
            .chat_service
            .list_messages()
            .await
            .to_graphql_result()?;

        Ok(messages.into_iter().map(Message::from).collect())
    }

    /// Get the messages of one room; empty when no room has that name
    async fn chat_room_messages(
        &self,
        ctx: &Context<'_>,
        room_name: String,
    ) -> Result<Vec<Message>> {
        let context = ctx.data::<GraphQLContext>()?;
        let messages = context
            .chat_service
            .chat_room_messages(&room_name)
            .await
            .to_graphql_result()?;

        Ok(messages.into_iter().map(Message::from).collect())
    }
}
