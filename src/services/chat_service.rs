use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, LoaderTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use std::fmt;
use tracing::{debug, info};

use crate::database::entities::{chat_rooms, messages, users};
use crate::errors::{ChatError, ChatResult};
use crate::services::auth_service::AuthService;

/// A message joined with the user who wrote it and the room it was posted to
#[derive(Clone, Debug, PartialEq)]
pub struct MessageDetails {
    pub message: messages::Model,
    pub user: users::Model,
    pub chat_room: chat_rooms::Model,
}

impl fmt::Display for MessageDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.user.username, self.message.preview())
    }
}

/// Arguments for registering a user
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

/// Typed access to users, chat rooms and messages.
///
/// Every listing is ordered by primary key, i.e. creation order.
#[derive(Clone)]
pub struct ChatService {
    db: DatabaseConnection,
    password_hash_cost: u32,
}

impl ChatService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_password_hash_cost(mut self, cost: u32) -> Self {
        self.password_hash_cost = cost;
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn list_users(&self) -> ChatResult<Vec<users::Model>> {
        Ok(users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_chat_rooms(&self) -> ChatResult<Vec<chat_rooms::Model>> {
        Ok(chat_rooms::Entity::find()
            .order_by_asc(chat_rooms::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// All messages with their user and chat room attached
    pub async fn list_messages(&self) -> ChatResult<Vec<MessageDetails>> {
        let messages = messages::Entity::find()
            .order_by_asc(messages::Column::Id)
            .all(&self.db)
            .await?;

        let users = messages.load_one(users::Entity, &self.db).await?;
        let chat_rooms = messages.load_one(chat_rooms::Entity, &self.db).await?;

        messages
            .into_iter()
            .zip(users)
            .zip(chat_rooms)
            .map(|((message, user), chat_room)| match (user, chat_room) {
                (Some(user), Some(chat_room)) => Ok(MessageDetails {
                    message,
                    user,
                    chat_room,
                }),
                _ => Err(dangling_message(&message)),
            })
            .collect()
    }

    pub async fn find_user(&self, username: &str) -> ChatResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    pub async fn find_chat_room(&self, name: &str) -> ChatResult<Option<chat_rooms::Model>> {
        Ok(chat_rooms::Entity::find()
            .filter(chat_rooms::Column::Name.eq(name))
            .one(&self.db)
            .await?)
    }

    /// Messages posted to the named room. An unknown room yields an empty list.
    pub async fn chat_room_messages(&self, room_name: &str) -> ChatResult<Vec<MessageDetails>> {
        let Some(chat_room) = self.find_chat_room(room_name).await? else {
            debug!("Chat room '{}' does not exist, returning no messages", room_name);
            return Ok(Vec::new());
        };

        let messages = messages::Entity::find()
            .filter(messages::Column::ChatRoomId.eq(chat_room.id))
            .order_by_asc(messages::Column::Id)
            .all(&self.db)
            .await?;

        let users = messages.load_one(users::Entity, &self.db).await?;

        messages
            .into_iter()
            .zip(users)
            .map(|(message, user)| match user {
                Some(user) => Ok(MessageDetails {
                    message,
                    user,
                    chat_room: chat_room.clone(),
                }),
                None => Err(dangling_message(&message)),
            })
            .collect()
    }

    pub async fn create_user(&self, input: NewUser) -> ChatResult<users::Model> {
        AuthService::validate_username(&input.username)?;

        if self.find_user(&input.username).await?.is_some() {
            return Err(ChatError::UsernameTaken(input.username));
        }

        let password_hash = AuthService::hash_password(&input.password, self.password_hash_cost)?;

        let mut user = users::ActiveModel::new();
        user.username = Set(input.username.clone());
        user.email = Set(normalize_email(input.email));
        user.password_hash = Set(password_hash);

        match user.insert(&self.db).await {
            Ok(user) => {
                info!("Created user {} (id {})", user, user.id);
                Ok(user)
            }
            Err(err) if is_unique_violation(&err) => Err(ChatError::UsernameTaken(input.username)),
            Err(err) => Err(err.into()),
        }
    }

    /// Look the room up by name and insert it on a miss. The flag is true
    /// only when this call inserted the room.
    pub async fn get_or_create_chat_room(
        &self,
        name: &str,
    ) -> ChatResult<(chat_rooms::Model, bool)> {
        validate_room_name(name)?;

        if let Some(chat_room) = self.find_chat_room(name).await? {
            return Ok((chat_room, false));
        }

        self.insert_chat_room(name).await
    }

    /// Insert a room whose lookup just missed, reading back a concurrent
    /// creator's row when the unique constraint rejects ours.
    async fn insert_chat_room(&self, name: &str) -> ChatResult<(chat_rooms::Model, bool)> {
        match chat_rooms::ActiveModel::new(name).insert(&self.db).await {
            Ok(chat_room) => {
                info!("Created chat room {} (id {})", chat_room, chat_room.id);
                Ok((chat_room, true))
            }
            Err(err) if is_unique_violation(&err) => {
                debug!("Chat room '{}' was created concurrently, reading it back", name);
                self.find_chat_room(name)
                    .await?
                    .map(|chat_room| (chat_room, false))
                    .ok_or_else(|| ChatError::ChatRoomExists(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Post a message as an existing user, creating the room if needed
    pub async fn create_message(
        &self,
        username: &str,
        room_name: &str,
        content: &str,
    ) -> ChatResult<MessageDetails> {
        let user = self
            .find_user(username)
            .await?
            .ok_or_else(|| ChatError::UserNotFound(username.to_string()))?;

        let (chat_room, _) = self.get_or_create_chat_room(room_name).await?;

        let message = messages::ActiveModel::new(user.id, chat_room.id, content)
            .insert(&self.db)
            .await?;

        let details = MessageDetails {
            message,
            user,
            chat_room,
        };
        debug!("Posted message {} to '{}'", details, details.chat_room);
        Ok(details)
    }
}

pub fn validate_room_name(name: &str) -> ChatResult<()> {
    if name.is_empty() {
        return Err(ChatError::validation("roomName", "cannot be empty"));
    }

    if name.chars().count() > chat_rooms::MAX_NAME_LENGTH {
        return Err(ChatError::validation(
            "roomName",
            format!("is too long (max {} characters)", chat_rooms::MAX_NAME_LENGTH),
        ));
    }

    Ok(())
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Foreign keys make this unreachable unless the schema was tampered with
fn dangling_message(message: &messages::Model) -> ChatError {
    ChatError::Database(DbErr::RecordNotFound(format!(
        "Message {} references a missing user or chat room",
        message.id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;

    async fn service() -> ChatService {
        ChatService::new(setup_test_db().await).with_password_hash_cost(4)
    }

    fn new_user(username: &str, password: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let service = service().await;

        assert!(service.list_users().await.unwrap().is_empty());
        assert!(service.list_chat_rooms().await.unwrap().is_empty());
        assert!(service.list_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let service = service().await;

        let user = service
            .create_user(NewUser {
                email: Some("alice@example.com".to_string()),
                ..new_user("alice", "pw1")
            })
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
        assert_ne!(user.password_hash, "pw1");
        assert!(AuthService::verify_password("pw1", &user.password_hash).unwrap());

        let stored = service.find_user("alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_blank_email_is_stored_as_absent() {
        let service = service().await;

        let user = service
            .create_user(NewUser {
                email: Some("   ".to_string()),
                ..new_user("bob", "pw")
            })
            .await
            .unwrap();

        assert_eq!(user.email, None);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let service = service().await;
        service.create_user(new_user("alice", "pw1")).await.unwrap();

        let err = service
            .create_user(new_user("alice", "other"))
            .await
            .unwrap_err();

        assert!(err.is_uniqueness_violation());
        assert_eq!(service.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_user_arguments() {
        let service = service().await;

        let err = service.create_user(new_user("", "pw")).await.unwrap_err();
        assert!(err.is_validation_error());

        let err = service.create_user(new_user("carol", "")).await.unwrap_err();
        assert!(err.is_validation_error());

        let err = service
            .create_user(new_user("carol", &"x".repeat(73)))
            .await
            .unwrap_err();
        assert!(err.is_validation_error());

        assert!(service.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_message_for_unknown_user() {
        let service = service().await;

        let err = service
            .create_message("ghost", "general", "boo")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(service.list_chat_rooms().await.unwrap().is_empty());
        assert!(service.list_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_message_creates_room_once() {
        let service = service().await;
        service.create_user(new_user("alice", "pw1")).await.unwrap();

        let first = service.create_message("alice", "general", "hi").await.unwrap();
        let second = service
            .create_message("alice", "general", "again")
            .await
            .unwrap();

        assert_eq!(first.chat_room.id, second.chat_room.id);
        assert_eq!(service.list_chat_rooms().await.unwrap().len(), 1);
        assert!(first.message.timestamp <= second.message.timestamp);
    }

    #[tokio::test]
    async fn test_get_or_create_chat_room() {
        let service = service().await;

        let (room, created) = service.get_or_create_chat_room("lobby").await.unwrap();
        assert!(created);
        assert_eq!(room.name, "lobby");

        let (again, created) = service.get_or_create_chat_room("lobby").await.unwrap();
        assert!(!created);
        assert_eq!(again.id, room.id);
    }

    #[tokio::test]
    async fn test_insert_conflict_reads_back_existing_room() {
        let service = service().await;

        // Another writer creates the room after our lookup missed
        let existing = chat_rooms::ActiveModel::new("lobby")
            .insert(service.db())
            .await
            .unwrap();

        let (room, created) = service.insert_chat_room("lobby").await.unwrap();

        assert!(!created);
        assert_eq!(room.id, existing.id);
        assert_eq!(service.list_chat_rooms().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_room_name_validation() {
        let service = service().await;

        let err = service.get_or_create_chat_room("").await.unwrap_err();
        assert!(err.is_validation_error());

        let err = service
            .get_or_create_chat_room(&"r".repeat(256))
            .await
            .unwrap_err();
        assert!(err.is_validation_error());

        assert!(service
            .get_or_create_chat_room(&"r".repeat(255))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_chat_room_messages_filters_by_room() {
        let service = service().await;
        service.create_user(new_user("alice", "pw1")).await.unwrap();
        service.create_user(new_user("bob", "pw2")).await.unwrap();

        service.create_message("alice", "general", "hi").await.unwrap();
        service.create_message("bob", "random", "yo").await.unwrap();
        service.create_message("bob", "general", "hey").await.unwrap();

        let general = service.chat_room_messages("general").await.unwrap();
        let contents: Vec<_> = general.iter().map(|m| m.message.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hey"]);
        assert_eq!(general[0].user.username, "alice");
        assert_eq!(general[1].user.username, "bob");
        assert!(general.iter().all(|m| m.chat_room.name == "general"));

        assert!(service.chat_room_messages("nonexistent").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_messages_joins_relations() {
        let service = service().await;
        service.create_user(new_user("alice", "pw1")).await.unwrap();
        service.create_message("alice", "general", "hi").await.unwrap();

        let messages = service.list_messages().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user.username, "alice");
        assert_eq!(messages[0].chat_room.name, "general");
        assert_eq!(messages[0].message.content, "hi");
    }

    #[tokio::test]
    async fn test_lists_are_in_creation_order() {
        let service = service().await;
        for name in ["zed", "amy", "mo"] {
            service.create_user(new_user(name, "pw")).await.unwrap();
        }
        for room in ["b", "a", "c"] {
            service.get_or_create_chat_room(room).await.unwrap();
        }

        let users: Vec<_> = service
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(users, vec!["zed", "amy", "mo"]);

        let rooms: Vec<_> = service
            .list_chat_rooms()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(rooms, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_message_display() {
        let service = service().await;
        service.create_user(new_user("alice", "pw1")).await.unwrap();

        let details = service
            .create_message("alice", "general", "a message that is longer than twenty")
            .await
            .unwrap();

        assert_eq!(details.to_string(), "alice: a message that is lo");
        assert_eq!(details.chat_room.to_string(), "general");
        assert_eq!(details.user.to_string(), "alice");
    }
}
