use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), AppError> {
    if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(AppError::validation("Missing fields"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_requires_all_fields() {
        assert!(validate_registration("Asha", "asha@example.com", "hunter2").is_ok());
        assert!(validate_registration("", "asha@example.com", "hunter2").is_err());
        assert!(validate_registration("Asha", "  ", "hunter2").is_err());
        assert!(validate_registration("Asha", "asha@example.com", "").is_err());
    }
}
