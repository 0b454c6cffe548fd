use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Number of content characters shown when a message is displayed.
pub const PREVIEW_LENGTH: usize = 20;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub chat_room_id: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub timestamp: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::chat_rooms::Entity",
        from = "Column::ChatRoomId",
        to = "super::chat_rooms::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ChatRooms,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::chat_rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChatRooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// The timestamp is taken here, at insert time; callers never supply it.
    pub fn new(user_id: i32, chat_room_id: i32, content: impl Into<String>) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: Set(user_id),
            chat_room_id: Set(chat_room_id),
            content: Set(content.into()),
            timestamp: Set(chrono::Utc::now()),
        }
    }
}

impl Model {
    /// Leading characters of the content, cut on a character boundary.
    pub fn preview(&self) -> &str {
        match self.content.char_indices().nth(PREVIEW_LENGTH) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str) -> Model {
        Model {
            id: 1,
            user_id: 1,
            chat_room_id: 1,
            content: content.to_string(),
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_preview_keeps_short_content() {
        assert_eq!(message("hi").preview(), "hi");
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let msg = message("the quick brown fox jumps over the lazy dog");
        assert_eq!(msg.preview(), "the quick brown fox ");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let msg = message("ééééééééééééééééééééééé");
        assert_eq!(msg.preview().chars().count(), PREVIEW_LENGTH);
    }
}
