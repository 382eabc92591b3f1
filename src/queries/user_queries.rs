use sqlx::PgPool;

use crate::{
    error::Result,
    models::{User, UserQuery, UserResponse, UserRole, UserSearchResponse},
    queries::{contains_pattern, page},
};

pub async fn create_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    password_hash: &str,
    role: UserRole,
    class: Option<&str>,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, name, password, role, class)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(role)
    .bind(class)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn search_users(pool: &PgPool, params: UserQuery) -> Result<UserSearchResponse> {
    let (limit, offset) = page(params.limit, params.offset);

    let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        "SELECT id, email, name, role, class, created_at, COUNT(*) OVER() as total_count FROM users WHERE 1=1",
    );

    if let Some(ref email) = params.email {
        query_builder.push(" AND email ILIKE ");
        query_builder.push_bind(contains_pattern(email));
    }

    if let Some(role) = params.role {
        query_builder.push(" AND role = ");
        query_builder.push_bind(role);
    }

    query_builder.push(" ORDER BY created_at DESC");
    query_builder.push(" LIMIT ");
    query_builder.push_bind(limit);
    query_builder.push(" OFFSET ");
    query_builder.push_bind(offset);

    #[derive(sqlx::FromRow)]
    struct SearchResult {
        #[sqlx(flatten)]
        user: UserResponse,
        total_count: i64,
    }

    let results = query_builder
        .build_query_as::<SearchResult>()
        .fetch_all(pool)
        .await?;

    let total = results.first().map(|r| r.total_count).unwrap_or(0);
    let users = results.into_iter().map(|r| r.user).collect();

    Ok(UserSearchResponse {
        users,
        total,
        limit,
        offset,
    })
}
