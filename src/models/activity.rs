use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Borrow,
    Return,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Borrow => "borrow",
            ActivityKind::Return => "return",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLogItem {
    pub kind: String,
    pub transaction_id: i32,
    pub user_id: i32,
    pub product_name: String,
    pub borrower_name: String,
    pub class: Option<String>,
    pub quantity: i32,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub kind: Option<ActivityKind>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ActivityLogResponse {
    pub items: Vec<ActivityLogItem>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
