use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::order::{Order, OrderItem};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub payment_method: Option<String>,
    pub tax: Option<f64>,
    pub delivery_fee: Option<f64>,
}

#[derive(Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub items: Vec<OrderItem>,
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

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            items: order.items.0,
            subtotal: order.subtotal,
            tax: order.tax,
            delivery_fee: order.delivery_fee,
            total_amount: order.total_amount,
            status: order.status,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            address: order.address,
            pincode: order.pincode,
            payment_method: order.payment_method,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
