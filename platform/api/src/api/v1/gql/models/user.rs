use async_graphql::SimpleObject;

use super::date::DateRFC3339;
use super::ulid::GqlUlid;
use crate::database;

#[derive(SimpleObject, Clone)]
pub struct User {
    pub id: GqlUlid,
    pub username: String,
    pub description: String,
    pub profile_picture_id: Option<GqlUlid>,
    pub profile_picture_path: Option<String>,
    pub created_at: DateRFC3339,
}

impl From<database::User> for User {
    fn from(value: database::User) -> Self {
        Self {
            id: value.id.into(),
            username: value.username,
            description: value.description,
            profile_picture_id: value.profile_picture_id.map(Into::into),
            profile_picture_path: value.profile_picture_path,
            created_at: value.created_at.into(),
        }
    }
}
