use async_graphql::*;

use crate::database::entities::users;

/// Public projection of a user; the password hash has no field here
#[derive(SimpleObject, Clone, Debug)]
pub struct User {
    pub id: ID,
    pub username: String,
    pub email: Option<String>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            username: model.username,
            email: model.email,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "CreateUser")]
pub struct CreateUserPayload {
    pub user: User,
}
