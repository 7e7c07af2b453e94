use async_graphql::SimpleObject;

use super::date::DateRFC3339;
use super::ulid::GqlUlid;

/// A signed login token and who it belongs to.
#[derive(SimpleObject, Clone)]
pub struct Session {
    /// The JWT bearer token to authenticate with.
    pub token: String,
    /// The user the session belongs to.
    pub user_id: GqlUlid,
    /// When the token stops being accepted.
    pub expires_at: DateRFC3339,
}
