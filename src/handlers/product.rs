// src/handlers/product.rs
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::instrument;

use crate::dtos::product::{ProductForm, ProductResponse};
use crate::error::AppError;
use crate::images;
use crate::models::product::{self, Product};
use crate::state::AppState;

const PRODUCT_COLUMNS: &str = "id, title, category, price, status, image, created_at, updated_at";

// GET /products - newest first
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
    ))
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// POST /products - multipart form, optional image file
#[instrument(skip(state, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let form = ProductForm::from_multipart(multipart).await?;

    let title = form.title.unwrap_or_default();
    let category = form.category.unwrap_or_default();
    let price = form.price.unwrap_or(-1.0);
    product::validate_new(&title, &category, price)?;
    let status = form.status.unwrap_or(true);

    // Upload first, persist second. A failed insert after a successful
    // upload leaves the stored asset behind.
    let image = match form.image {
        Some(upload) => Some(
            images::store_image(
                state.config.asset_host.as_ref(),
                &state.config.uploads_dir,
                &upload.filename,
                upload.bytes,
            )
            .await?,
        ),
        None => None,
    };

    let created = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (title, category, price, status, image)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&title)
    .bind(&category)
    .bind(price)
    .bind(status)
    .bind(&image)
    .fetch_one(&state.db_pool)
    .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(created))))
}

// PUT /products/:id - partial update; absent fields keep current values.
// An unknown id answers with a JSON null body rather than 404.
#[instrument(skip(state, multipart), fields(id))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Option<ProductResponse>>, AppError> {
    let form = ProductForm::from_multipart(multipart).await?;

    if let Some(price) = form.price {
        product::validate_price(price)?;
    }

    let image = match form.image {
        Some(upload) => Some(
            images::store_image(
                state.config.asset_host.as_ref(),
                &state.config.uploads_dir,
                &upload.filename,
                upload.bytes,
            )
            .await?,
        ),
        None => None,
    };

    let updated = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products SET
         title = COALESCE($1, title),
         category = COALESCE($2, category),
         price = COALESCE($3, price),
         status = COALESCE($4, status),
         image = COALESCE($5, image),
         updated_at = NOW()
         WHERE id = $6
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(form.title)
    .bind(form.category)
    .bind(form.price)
    .bind(form.status)
    .bind(image)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?;

    Ok(Json(updated.map(ProductResponse::from)))
}

// DELETE /products/:id - unconditional; historical orders keep their
// snapshotted line items.
#[instrument(skip(state), fields(id))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    Ok(Json(json!({ "success": true })))
}
