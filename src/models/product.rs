use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, FromRow)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub status: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn validate_new(title: &str, category: &str, price: f64) -> Result<(), AppError> {
    if title.trim().is_empty() || category.trim().is_empty() {
        return Err(AppError::validation("Missing fields"));
    }
    validate_price(price)
}

pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::validation("Price must be non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_requires_title_category_and_valid_price() {
        assert!(validate_new("Masala Dosa", "south-indian", 8.5).is_ok());
        assert!(validate_new("", "south-indian", 8.5).is_err());
        assert!(validate_new("Masala Dosa", " ", 8.5).is_err());
        assert!(validate_new("Masala Dosa", "south-indian", -1.0).is_err());
    }

    #[test]
    fn price_must_be_a_finite_non_negative_number() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }
}
