use std::sync::Arc;

use tokio::sync::RwLock;

use super::auth::{AuthData, AuthError};

#[derive(Default)]
struct ContextData {
    auth: Option<AuthData>,
}

/// Per-request state shared between the http middleware and the GraphQL
/// resolvers. Login mutations update it so later fields in the same request
/// see the fresh identity.
#[derive(Default, Clone)]
pub struct RequestContext(Arc<RwLock<ContextData>>);

impl RequestContext {
    pub async fn set_auth(&self, data: AuthData) {
        let mut guard = self.0.write().await;
        guard.auth = Some(data);
    }

    pub async fn reset_auth(&self) {
        let mut guard = self.0.write().await;
        guard.auth = None;
    }

    pub async fn auth(&self) -> Result<Option<AuthData>, AuthError> {
        let auth = self.0.read().await.auth.clone();

        match auth {
            Some(auth) if !auth.is_valid() => Err(AuthError::TokenExpired),
            auth => Ok(auth),
        }
    }
}
