use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::Error as SqlxError;

use crate::auth::jwt::sign_token;
use crate::dtos::user::{AuthResponse, LoginRequest, MeResponse, RegisterRequest, UserProfile};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::user::{self, User, ROLE_ADMIN, ROLE_USER};
use crate::state::AppState;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

fn map_unique_violation(err: SqlxError, message: &str) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::conflict(message)
        }
        other => other.into(),
    }
}

// Asking for admin requires the configured secret; anything else registers
// as a plain user.
fn resolve_role(
    requested: Option<&str>,
    admin_secret: Option<&str>,
    expected_secret: &str,
) -> Result<&'static str, AppError> {
    match requested {
        Some(ROLE_ADMIN) => {
            if admin_secret != Some(expected_secret) {
                return Err(AppError::forbidden("Invalid admin secret"));
            }
            Ok(ROLE_ADMIN)
        }
        _ => Ok(ROLE_USER),
    }
}

// POST /api/auth/register
pub async fn register(
    State(AppState { db_pool, config }): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let name = payload.name.as_deref().unwrap_or("").trim().to_string();
    let email = payload.email.as_deref().unwrap_or("").trim().to_string();
    let password = payload.password.as_deref().unwrap_or("");
    user::validate_registration(&name, &email, password)?;

    let role = resolve_role(
        payload.role.as_deref(),
        payload.admin_secret.as_deref(),
        &config.admin_secret,
    )?;

    let password_hash =
        hash(password, DEFAULT_COST).map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let created = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (name, email, password_hash, role)
         VALUES ($1, $2, $3, $4)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Email already in use"))?;

    let token = sign_token(
        created.id,
        &created.role,
        &config.jwt_secret,
        config.jwt_expires_in_days,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: created.into(),
        }),
    ))
}

// POST /api/auth/login
pub async fn login(
    State(AppState { db_pool, config }): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = payload.email.as_deref().unwrap_or("").trim();
    let password = payload.password.as_deref().unwrap_or("");
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Missing credentials"));
    }

    // Same message for unknown email and bad password
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let ok = verify(password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;
    if !ok {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = sign_token(
        user.id,
        &user.role,
        &config.jwt_secret,
        config.jwt_expires_in_days,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

// GET /api/auth/me
pub async fn me(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<MeResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(auth.user_id)
    .fetch_optional(&db_pool)
    .await?;

    Ok(Json(MeResponse {
        user: user.map(UserProfile::from),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_needs_the_matching_secret() {
        assert_eq!(
            resolve_role(Some("admin"), Some("s3cret"), "s3cret").unwrap(),
            ROLE_ADMIN
        );
        assert!(resolve_role(Some("admin"), Some("wrong"), "s3cret").is_err());
        assert!(resolve_role(Some("admin"), None, "s3cret").is_err());
    }

    #[test]
    fn any_other_requested_role_registers_as_user() {
        assert_eq!(resolve_role(None, None, "s3cret").unwrap(), ROLE_USER);
        assert_eq!(resolve_role(Some("user"), None, "s3cret").unwrap(), ROLE_USER);
        assert_eq!(
            resolve_role(Some("superuser"), Some("s3cret"), "s3cret").unwrap(),
            ROLE_USER
        );
    }
}
