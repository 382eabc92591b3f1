use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub stock: i32,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub stock: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

/// What an update does to the product image. A blank `image_url` clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChange {
    Keep,
    Set(String),
    Remove,
}

/// Validated, trimmed form of [`UpdateProductRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub stock: Option<i32>,
    pub image: ImageChange,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    pub archived: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub archived: Option<bool>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProductSearchResponse {
    pub products: Vec<Product>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct ImageUploadRequest {
    pub content_type: String,
}

#[derive(Debug, Serialize)]
pub struct ImageUploadUrl {
    pub key: String,
    pub upload_url: String,
    pub public_url: String,
}
