use sqlx::PgPool;

use crate::{
    error::{AppError, Result},
    models::{
        ActiveTransaction, Product, ReturnEvent, ReturnResponse, Transaction, TransactionDetail,
        TransactionQuery, TransactionSearchResponse,
    },
    queries::page,
    utils::validation,
};

pub struct NewBorrow<'a> {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub borrower_name: &'a str,
    pub class: Option<&'a str>,
    pub reason: Option<&'a str>,
}

/// Records a borrow and takes the units out of stock in one database
/// transaction. The product row stays locked until commit.
pub async fn create_borrow(pool: &PgPool, borrow: &NewBorrow<'_>) -> Result<Transaction> {
    let mut tx = pool.begin().await?;

    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
        .bind(borrow.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Product with id {} not found", borrow.product_id))
        })?;

    validation::validate_borrow(&product, borrow.quantity)?;

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (user_id, product_id, quantity, borrower_name, class, reason)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(borrow.user_id)
    .bind(borrow.product_id)
    .bind(borrow.quantity)
    .bind(borrow.borrower_name)
    .bind(borrow.class)
    .bind(borrow.reason)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE products SET stock = stock - $1 WHERE id = $2")
        .bind(borrow.quantity)
        .bind(borrow.product_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(transaction)
}

/// Returns part or all of a borrower's outstanding quantity and puts the
/// units back in stock. Rows owned by other users are reported as missing.
pub async fn record_return(
    pool: &PgPool,
    transaction_id: i32,
    user_id: i32,
    quantity: i32,
    reason: Option<&str>,
) -> Result<ReturnResponse> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(transaction_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", transaction_id)))?;

    validation::validate_return(&current, quantity)?;

    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        UPDATE transactions
        SET returned_quantity = returned_quantity + $1
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(quantity)
    .bind(transaction_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE products SET stock = stock + $1 WHERE id = $2")
        .bind(quantity)
        .bind(transaction.product_id)
        .execute(&mut *tx)
        .await?;

    let event = sqlx::query_as::<_, ReturnEvent>(
        r#"
        INSERT INTO return_events (transaction_id, quantity, reason)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(transaction_id)
    .bind(quantity)
    .bind(reason)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(ReturnResponse { transaction, event })
}

pub async fn active_for_user(pool: &PgPool, user_id: i32) -> Result<Vec<ActiveTransaction>> {
    let items = sqlx::query_as::<_, ActiveTransaction>(
        r#"
        SELECT
            t.id,
            t.product_id,
            p.name AS product_name,
            t.quantity,
            t.returned_quantity,
            t.quantity - t.returned_quantity AS outstanding,
            t.created_at
        FROM transactions t
        JOIN products p ON p.id = t.product_id
        WHERE t.user_id = $1 AND t.returned_quantity < t.quantity
        ORDER BY t.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn search_transactions(
    pool: &PgPool,
    params: TransactionQuery,
) -> Result<TransactionSearchResponse> {
    let (limit, offset) = page(params.limit, params.offset);

    let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        r#"
        SELECT
            t.*,
            p.name AS product_name,
            u.name AS user_name,
            u.email AS user_email,
            COUNT(*) OVER() AS total_count
        FROM transactions t
        JOIN products p ON p.id = t.product_id
        JOIN users u ON u.id = t.user_id
        WHERE 1=1
        "#,
    );

    if let Some(user_id) = params.user_id {
        query_builder.push(" AND t.user_id = ");
        query_builder.push_bind(user_id);
    }

    if let Some(product_id) = params.product_id {
        query_builder.push(" AND t.product_id = ");
        query_builder.push_bind(product_id);
    }

    match params.active {
        Some(true) => {
            query_builder.push(" AND t.returned_quantity < t.quantity");
        }
        Some(false) => {
            query_builder.push(" AND t.returned_quantity = t.quantity");
        }
        None => {}
    }

    query_builder.push(" ORDER BY t.created_at DESC");
    query_builder.push(" LIMIT ");
    query_builder.push_bind(limit);
    query_builder.push(" OFFSET ");
    query_builder.push_bind(offset);

    #[derive(sqlx::FromRow)]
    struct SearchResult {
        #[sqlx(flatten)]
        detail: TransactionDetail,
        total_count: i64,
    }

    let results = query_builder
        .build_query_as::<SearchResult>()
        .fetch_all(pool)
        .await?;

    let total = results.first().map(|r| r.total_count).unwrap_or(0);
    let transactions = results.into_iter().map(|r| r.detail).collect();

    Ok(TransactionSearchResponse {
        transactions,
        total,
        limit,
        offset,
    })
}
