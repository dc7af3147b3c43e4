use axum::{middleware, routing::{get, post}, Router};

use crate::handlers::auth::{login, me, register};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let protected = Router::new()
        .route("/api/auth/me", get(me))
        .layer(middleware::from_fn_with_state(state, require_auth));

    open.merge(protected)
}
