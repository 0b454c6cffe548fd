use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::graphql::types::{ChatRoom, User};
use crate::services::MessageDetails;

/// A message with its author and room already resolved
#[derive(SimpleObject, Clone, Debug)]
pub struct Message {
    pub id: ID,
    pub user: User,
    pub chat_room: ChatRoom,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<MessageDetails> for Message {
    fn from(details: MessageDetails) -> Self {
        Self {
            id: ID::from(details.message.id.to_string()),
            user: User::from(details.user),
            chat_room: ChatRoom::from(details.chat_room),
            content: details.message.content,
            timestamp: details.message.timestamp,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "CreateMessage")]
pub struct CreateMessagePayload {
    pub message: Message,
}
