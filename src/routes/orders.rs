use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::order::{create_order, delete_order, get_orders, update_order_status};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(get_orders).post(create_order))
        .route("/api/orders/{id}", put(update_order_status).delete(delete_order))
}
