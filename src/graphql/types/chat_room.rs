use async_graphql::*;

use crate::database::entities::chat_rooms;

#[derive(SimpleObject, Clone, Debug)]
pub struct ChatRoom {
    pub id: ID,
    pub name: String,
}

impl From<chat_rooms::Model> for ChatRoom {
    fn from(model: chat_rooms::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            name: model.name,
        }
    }
}
