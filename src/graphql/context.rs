use std::sync::Arc;

use crate::services::ChatService;

#[derive(Clone)]
pub struct GraphQLContext {
    pub chat_service: Arc<ChatService>,
}

impl GraphQLContext {
    pub fn with_chat_service(chat_service: ChatService) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
        }
    }
}
