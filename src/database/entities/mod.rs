pub mod chat_rooms;
pub mod messages;
pub mod users;
