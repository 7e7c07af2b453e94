use std::sync::Arc;

use async_graphql::Context;

use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

pub trait ContextExt {
    fn get_global(&self) -> &Arc<GlobalState>;
    fn get_req_context(&self) -> &RequestContext;
}

impl ContextExt for Context<'_> {
    fn get_global(&self) -> &Arc<GlobalState> {
        self.data_unchecked()
    }

    fn get_req_context(&self) -> &RequestContext {
        self.data_unchecked()
    }
}

pub trait RequestExt {
    fn provide_global(self, global: Arc<GlobalState>) -> Self;
    fn provide_context(self, ctx: RequestContext) -> Self;
}

impl RequestExt for async_graphql::Request {
    fn provide_global(self, global: Arc<GlobalState>) -> Self {
        self.data(global)
    }

    fn provide_context(self, ctx: RequestContext) -> Self {
        self.data(ctx)
    }
}
