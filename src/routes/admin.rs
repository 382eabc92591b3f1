use axum::{
    Json,
    extract::{Path, Query, State},
};

use http::StatusCode;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        ActivityLogResponse, ActivityQuery, ArchiveRequest, CreateProductRequest, ImageChange,
        ImageUploadRequest, ImageUploadUrl, Product, ProductQuery, ProductSearchResponse,
        TransactionQuery, TransactionSearchResponse, UpdateProductRequest, UserQuery,
        UserSearchResponse,
    },
    queries::{activity_queries, product_queries, transaction_queries, user_queries},
    services::image_url_service::{
        delete_single_object, key_from_public_url, product_image_key, public_url, put_object_url,
    },
    utils::validation,
};

//PRODUCT ROUTES
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<ProductSearchResponse>> {
    let response = product_queries::search_products(&state.db, params).await?;

    Ok(Json(response))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    validation::validate_product_name(&payload.name)?;
    validation::validate_stock(payload.stock)?;

    let image_url = validation::normalize_optional(payload.image_url);

    let product = product_queries::create_product(
        &state.db,
        payload.name.trim(),
        payload.stock,
        image_url.as_deref(),
    )
    .await?;

    tracing::info!("Product {} created with stock {}", product.id, product.stock);

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let changes = validation::product_changes(payload)?;

    let existing = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    let product = product_queries::update_product(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    if changes.image != ImageChange::Keep && existing.image_url != product.image_url {
        remove_replaced_image(&state, existing.image_url.as_deref()).await;
    }

    Ok(Json(product))
}

/// Deletes an image we uploaded once the product no longer points at it.
/// Failures are only logged.
async fn remove_replaced_image(state: &AppState, old_url: Option<&str>) {
    let Some(key) = old_url.and_then(|url| key_from_public_url(&state.storage.assets_url, url))
    else {
        return;
    };

    if let Err(e) = delete_single_object(&state.s3_client, &state.storage.bucket, key).await {
        tracing::warn!("Could not remove replaced image {}: {}", key, e);
    }
}

pub async fn set_archived(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ArchiveRequest>,
) -> Result<Json<Product>> {
    let product = product_queries::set_archived(&state.db, id, payload.archived)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    tracing::info!(
        "Product {} {}",
        product.id,
        if product.archived { "archived" } else { "restored" }
    );

    Ok(Json(product))
}

pub async fn generate_image_url(
    State(state): State<AppState>,
    Json(payload): Json<ImageUploadRequest>,
) -> Result<Json<ImageUploadUrl>> {
    let extension = validation::image_extension(&payload.content_type)?;
    let key = product_image_key(state.environment, extension);

    let upload_url = put_object_url(
        &state.s3_client,
        &state.storage.bucket,
        &key,
        &payload.content_type,
        state.storage.upload_expiry_secs,
    )
    .await?;

    let public_url = public_url(&state.storage.assets_url, &key);

    Ok(Json(ImageUploadUrl {
        key,
        upload_url,
        public_url,
    }))
}

//HISTORY ROUTES
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionSearchResponse>> {
    let response = transaction_queries::search_transactions(&state.db, params).await?;

    Ok(Json(response))
}

pub async fn activity_log(
    State(state): State<AppState>,
    Query(params): Query<ActivityQuery>,
) -> Result<Json<ActivityLogResponse>> {
    let response = activity_queries::list_activity(&state.db, params).await?;

    Ok(Json(response))
}

//USER ROUTES
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<UserSearchResponse>> {
    let response = user_queries::search_users(&state.db, params).await?;

    Ok(Json(response))
}
