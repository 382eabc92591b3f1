use axum::{Json, extract::State};

use crate::{AppState, error::Result, models::Product, queries::product_queries};

pub async fn list_available(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = product_queries::list_available(&state.db).await?;

    Ok(Json(products))
}
