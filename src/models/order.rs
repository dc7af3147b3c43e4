use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::error::AppError;

pub const ORDER_STATUSES: [&str; 4] = ["pending", "confirmed", "delivered", "cancelled"];
pub const PAYMENT_METHODS: [&str; 3] = ["cod", "card", "upi"];

/// Snapshot of a product at purchase time. Kept verbatim in the order row so
/// later catalog edits or deletions never change order history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    pub title: String,
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, FromRow)]
pub struct Order {
    pub id: i64,
    pub items: Json<Vec<OrderItem>>,
    pub subtotal: f64,
    pub tax: f64,
    pub delivery_fee: f64,
    pub total_amount: f64,
    pub status: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn validate_items(items: &[OrderItem]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::validation("Items required"));
    }
    for item in items {
        if item.title.trim().is_empty() {
            return Err(AppError::validation("Item title required"));
        }
        if item.quantity < 1 {
            return Err(AppError::validation("Item quantity must be at least 1"));
        }
    }
    Ok(())
}

pub fn validate_status(status: &str) -> Result<(), AppError> {
    if ORDER_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::validation(format!("Unknown order status: {status}")))
    }
}

pub fn validate_payment_method(method: &str) -> Result<(), AppError> {
    if PAYMENT_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Unknown payment method: {method}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, price: f64, quantity: i64) -> OrderItem {
        OrderItem {
            product_id: None,
            title: title.to_string(),
            price,
            quantity,
            image: None,
        }
    }

    #[test]
    fn empty_item_lists_are_rejected() {
        assert!(validate_items(&[]).is_err());
        assert!(validate_items(&[item("Paneer Tikka", 9.5, 1)]).is_ok());
    }

    #[test]
    fn zero_quantity_items_are_rejected() {
        assert!(validate_items(&[item("Paneer Tikka", 9.5, 0)]).is_err());
        assert!(validate_items(&[item("", 9.5, 1)]).is_err());
    }

    #[test]
    fn only_the_known_statuses_parse() {
        for status in ORDER_STATUSES {
            assert!(validate_status(status).is_ok());
        }
        assert!(validate_status("shipped").is_err());
        assert!(validate_status("Pending").is_err());
    }

    #[test]
    fn only_the_known_payment_methods_parse() {
        for method in PAYMENT_METHODS {
            assert!(validate_payment_method(method).is_ok());
        }
        assert!(validate_payment_method("paypal").is_err());
    }

    #[test]
    fn item_json_uses_camel_case_and_defaults_quantity() {
        let parsed: OrderItem =
            serde_json::from_str(r#"{"productId": 7, "title": "Thali", "price": 12.0}"#).unwrap();
        assert_eq!(parsed.product_id, Some(7));
        assert_eq!(parsed.quantity, 1);

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["productId"], 7);
        assert!(json.get("image").is_none());
    }
}
