use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub returned_quantity: i32,
    pub borrower_name: String,
    pub class: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Units still out on loan.
    pub fn outstanding(&self) -> i32 {
        self.quantity - self.returned_quantity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReturnEvent {
    pub id: i32,
    pub transaction_id: i32,
    pub quantity: i32,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of the borrower's "currently borrowed" list.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActiveTransaction {
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub returned_quantity: i32,
    pub outstanding: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transaction: Transaction,
    pub product_name: String,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Deserialize)]
pub struct BorrowRequest {
    pub product_id: i32,
    pub quantity: i32,
    pub borrower_name: Option<String>,
    pub class: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    pub quantity: i32,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    pub transaction: Transaction,
    pub event: ReturnEvent,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub user_id: Option<i32>,
    pub product_id: Option<i32>,
    pub active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TransactionSearchResponse {
    pub transactions: Vec<TransactionDetail>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
