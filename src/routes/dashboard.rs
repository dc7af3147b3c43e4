use axum::{middleware, routing::get, Router};

use crate::handlers::dashboard::{get_stats, list_users};
use crate::middleware::auth::{require_admin, require_auth};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let open = Router::new().route("/api/dashboard/stats", get(get_stats));

    // layered inside-out: require_auth runs first, then the role check
    let admin = Router::new()
        .route("/api/dashboard/users", get(list_users))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, require_auth));

    open.merge(admin)
}
