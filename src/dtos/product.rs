// src/dtos/product.rs
use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::models::product::Product;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub status: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Convert from Model to Response DTO
impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            category: product.category,
            price: product.price,
            status: product.status,
            image: product.image,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Multipart product form. All fields optional; create validates presence,
/// update treats absence as "keep the current value".
#[derive(Debug, Default)]
pub struct ProductForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub status: Option<bool>,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ProductForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart form: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "title" => form.title = Some(read_text(field).await?),
                "category" => form.category = Some(read_text(field).await?),
                "price" => {
                    let raw = read_text(field).await?;
                    let price = raw
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| AppError::validation("Invalid price"))?;
                    form.price = Some(price);
                }
                "status" => {
                    let raw = read_text(field).await?;
                    form.status = Some(parse_status_flag(&raw));
                }
                "image" => {
                    let filename = field.file_name().unwrap_or("image").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Unreadable image field: {e}")))?;
                    form.image = Some(ImageUpload {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Unreadable form field: {e}")))
}

// Form values arrive as strings; anything but "true" means out of stock.
fn parse_status_flag(raw: &str) -> bool {
    raw.trim() == "true"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_flag_is_true_only_for_the_literal_string() {
        assert!(parse_status_flag("true"));
        assert!(parse_status_flag(" true "));
        assert!(!parse_status_flag("false"));
        assert!(!parse_status_flag("TRUE"));
        assert!(!parse_status_flag("1"));
        assert!(!parse_status_flag(""));
    }
}
