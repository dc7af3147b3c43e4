use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_products: u64,
    pub in_stock: u64,
    pub in_stock_percentage: i64,
    pub total_orders: u64,
    pub today_orders: u64,
    pub total_revenue: f64,
}
