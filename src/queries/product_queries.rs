use sqlx::PgPool;

use crate::{
    error::Result,
    models::{ImageChange, Product, ProductChanges, ProductQuery, ProductSearchResponse},
    queries::{contains_pattern, page},
};

/// Catalog as borrowers see it: everything not archived, newest first.
pub async fn list_available(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE archived = FALSE ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn create_product(
    pool: &PgPool,
    name: &str,
    stock: i32,
    image_url: Option<&str>,
) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, stock, image_url)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(stock)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    changes: &ProductChanges,
) -> Result<Option<Product>> {
    let (touch_image, image_url) = match &changes.image {
        ImageChange::Keep => (false, None),
        ImageChange::Set(url) => (true, Some(url.as_str())),
        ImageChange::Remove => (true, None),
    };

    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = COALESCE($1, name),
            stock = COALESCE($2, stock),
            image_url = CASE WHEN $3 THEN $4 ELSE image_url END
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(changes.name.as_deref())
    .bind(changes.stock)
    .bind(touch_image)
    .bind(image_url)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn set_archived(pool: &PgPool, id: i32, archived: bool) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET archived = $1 WHERE id = $2 RETURNING *",
    )
    .bind(archived)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn search_products(pool: &PgPool, params: ProductQuery) -> Result<ProductSearchResponse> {
    let (limit, offset) = page(params.limit, params.offset);

    let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        "SELECT *, COUNT(*) OVER() as total_count FROM products WHERE 1=1",
    );

    if let Some(archived) = params.archived {
        query_builder.push(" AND archived = ");
        query_builder.push_bind(archived);
    }

    if let Some(ref search) = params.search {
        query_builder.push(" AND name ILIKE ");
        query_builder.push_bind(contains_pattern(search));
    }

    query_builder.push(" ORDER BY created_at DESC");
    query_builder.push(" LIMIT ");
    query_builder.push_bind(limit);
    query_builder.push(" OFFSET ");
    query_builder.push_bind(offset);

    #[derive(sqlx::FromRow)]
    struct SearchResult {
        #[sqlx(flatten)]
        product: Product,
        total_count: i64,
    }

    let results = query_builder
        .build_query_as::<SearchResult>()
        .fetch_all(pool)
        .await?;

    let total = results.first().map(|r| r.total_count).unwrap_or(0);
    let products = results.into_iter().map(|r| r.product).collect();

    Ok(ProductSearchResponse {
        products,
        total,
        limit,
        offset,
    })
}
