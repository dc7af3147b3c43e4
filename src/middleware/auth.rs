use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: String,
}

pub async fn require_auth(
    State(AppState { config, .. }): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match bearer_token(header) {
        Some(t) => t,
        None => return AppError::unauthorized("No token").into_response(),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        role: claims.role,
    });

    next.run(req).await
}

pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<AuthContext>() {
        Some(ctx) if ctx.role == "admin" => next.run(req).await,
        Some(_) => AppError::forbidden("Forbidden").into_response(),
        None => AppError::unauthorized("No token").into_response(),
    }
}

// Expect "Bearer <token>"
fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix("Bearer ").filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_extracts_the_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_missing_headers() {
        assert_eq!(bearer_token(Some("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(None), None);
    }
}
