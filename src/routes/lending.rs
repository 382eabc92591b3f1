use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ActiveTransaction, BorrowRequest, ReturnRequest, ReturnResponse, Transaction},
    queries::{
        transaction_queries::{self, NewBorrow},
        user_queries,
    },
    utils::{extractors::extract_user_id, jwt::Claims, validation},
};

pub async fn borrow_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<BorrowRequest>,
) -> Result<(StatusCode, Json<Transaction>)> {
    let user_id = extract_user_id(&claims)?;

    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Profile not found".to_string()))?;

    // Form fields fall back to the borrower's own profile
    let borrower_name =
        validation::normalize_optional(payload.borrower_name).unwrap_or(user.name);
    validation::validate_name(&borrower_name)?;

    let class = validation::normalize_optional(payload.class).or(user.class);
    validation::validate_class(class.as_deref())?;
    let reason = validation::normalize_optional(payload.reason);

    let transaction = transaction_queries::create_borrow(
        &state.db,
        &NewBorrow {
            user_id,
            product_id: payload.product_id,
            quantity: payload.quantity,
            borrower_name: &borrower_name,
            class: class.as_deref(),
            reason: reason.as_deref(),
        },
    )
    .await?;

    tracing::info!(
        "User {} borrowed {} of product {} (transaction {})",
        user_id,
        transaction.quantity,
        transaction.product_id,
        transaction.id
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn active_transactions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<ActiveTransaction>>> {
    let user_id = extract_user_id(&claims)?;

    let items = transaction_queries::active_for_user(&state.db, user_id).await?;

    Ok(Json(items))
}

pub async fn return_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<ReturnRequest>,
) -> Result<Json<ReturnResponse>> {
    let user_id = extract_user_id(&claims)?;
    let reason = validation::normalize_optional(payload.reason);

    let response = transaction_queries::record_return(
        &state.db,
        id,
        user_id,
        payload.quantity,
        reason.as_deref(),
    )
    .await?;

    tracing::info!(
        "Transaction {} returned {} ({} of {} back)",
        id,
        payload.quantity,
        response.transaction.returned_quantity,
        response.transaction.quantity
    );

    Ok(Json(response))
}
