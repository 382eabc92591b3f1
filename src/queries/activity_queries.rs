use sqlx::PgPool;

use crate::{
    error::Result,
    models::{ActivityLogItem, ActivityLogResponse, ActivityQuery},
    queries::page,
};

pub async fn list_activity(pool: &PgPool, params: ActivityQuery) -> Result<ActivityLogResponse> {
    let (limit, offset) = page(params.limit, params.offset);

    let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        "SELECT *, COUNT(*) OVER() as total_count FROM activity_log WHERE 1=1",
    );

    if let Some(kind) = params.kind {
        query_builder.push(" AND kind = ");
        query_builder.push_bind(kind.as_str());
    }

    query_builder.push(" ORDER BY created_at DESC");
    query_builder.push(" LIMIT ");
    query_builder.push_bind(limit);
    query_builder.push(" OFFSET ");
    query_builder.push_bind(offset);

    #[derive(sqlx::FromRow)]
    struct SearchResult {
        #[sqlx(flatten)]
        item: ActivityLogItem,
        total_count: i64,
    }

    let results = query_builder
        .build_query_as::<SearchResult>()
        .fetch_all(pool)
        .await?;

    let total = results.first().map(|r| r.total_count).unwrap_or(0);
    let items = results.into_iter().map(|r| r.item).collect();

    Ok(ActivityLogResponse {
        items,
        total,
        limit,
        offset,
    })
}
