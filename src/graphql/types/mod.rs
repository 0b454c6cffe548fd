pub mod chat_room;
pub mod message;
pub mod user;

pub use chat_room::*;
pub use message::*;
pub use user::*;
