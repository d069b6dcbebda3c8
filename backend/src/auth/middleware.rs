use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::identity::resolve_identity;
use crate::AppState;

/// Attach the resolved `Caller` to request extensions when one resolves.
/// Never rejects; handlers decide whether an identity is required.
pub async fn attach_identity(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match resolve_identity(req.headers(), state.config.runtime_mode) {
        Some(caller) => {
            tracing::debug!(caller_id = caller.id, "Resolved caller identity");
            req.extensions_mut().insert(caller);
        }
        None => tracing::debug!("No caller identity on request"),
    }
    next.run(req).await
}
