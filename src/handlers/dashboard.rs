// src/handlers/dashboard.rs
use axum::extract::State;
use axum::Json;
use chrono::{Local, NaiveDate};
use tracing::instrument;

use crate::dtos::dashboard::StatsResponse;
use crate::dtos::user::UserSummary;
use crate::error::AppError;
use crate::models::order::Order;
use crate::models::product::Product;
use crate::state::AppState;

// GET /api/dashboard/stats
//
// Full scans over both tables; fine at this catalog size.
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, title, category, price, status, image, created_at, updated_at FROM products",
    )
    .fetch_all(&state.db_pool)
    .await?;

    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, items, subtotal, tax, delivery_fee, total_amount, status,
                customer_name, customer_email, customer_phone, address, pincode, payment_method,
                created_at, updated_at
         FROM orders",
    )
    .fetch_all(&state.db_pool)
    .await?;

    let today = Local::now().date_naive();
    Ok(Json(compute_stats(&products, &orders, today)))
}

// "Today" is a calendar-date comparison in server-local time.
fn compute_stats(products: &[Product], orders: &[Order], today: NaiveDate) -> StatsResponse {
    let total_products = products.len() as u64;
    let in_stock = products.iter().filter(|p| p.status).count() as u64;
    let in_stock_percentage = if total_products == 0 {
        0
    } else {
        ((in_stock as f64 / total_products as f64) * 100.0).round() as i64
    };

    let total_orders = orders.len() as u64;
    let today_orders = orders
        .iter()
        .filter(|o| o.created_at.with_timezone(&Local).date_naive() == today)
        .count() as u64;
    let total_revenue = orders.iter().map(|o| o.total_amount).sum();

    StatsResponse {
        total_products,
        in_stock,
        in_stock_percentage,
        total_orders,
        today_orders,
        total_revenue,
    }
}

// GET /api/dashboard/users - admin only, password hashes never leave the row
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, email, role, created_at FROM users ORDER BY created_at DESC",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use sqlx::types::Json as SqlJson;

    fn product(status: bool) -> Product {
        let now = Utc::now();
        Product {
            id: 1,
            title: "Garlic Naan".to_string(),
            category: "breads".to_string(),
            price: 3.5,
            status,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn order(total: f64, created_at: DateTime<Utc>) -> Order {
        Order {
            id: 1,
            items: SqlJson(Vec::new()),
            subtotal: total,
            tax: 0.0,
            delivery_fee: 0.0,
            total_amount: total,
            status: "pending".to_string(),
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            address: None,
            pincode: None,
            payment_method: "cod".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn percentage_is_zero_without_products() {
        let stats = compute_stats(&[], &[], Local::now().date_naive());
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.in_stock_percentage, 0);
        assert_eq!(stats.total_revenue, 0.0);
    }

    #[test]
    fn percentage_is_rounded() {
        let products = vec![product(true), product(true), product(false)];
        let stats = compute_stats(&products, &[], Local::now().date_naive());
        assert_eq!(stats.in_stock, 2);
        // 2/3 -> 66.66..% -> 67
        assert_eq!(stats.in_stock_percentage, 67);
    }

    #[test]
    fn today_orders_only_counts_the_local_calendar_date() {
        let now = Utc::now();
        let orders = vec![
            order(20.0, now),
            order(30.0, now - Duration::days(3)),
        ];
        let today = now.with_timezone(&Local).date_naive();
        let stats = compute_stats(&[], &orders, today);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.today_orders, 1);
        assert_eq!(stats.total_revenue, 50.0);
    }
}
