use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{self, AppConfig, AuthConfig, Environment, StorageConfig},
    database,
    error::{AppError, Result},
    routes,
    services::SessionRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3_client: aws_sdk_s3::Client,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub environment: Environment,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(db: PgPool, s3_client: aws_sdk_s3::Client, config: &AppConfig) -> Self {
        Self {
            db,
            s3_client,
            storage: config.storage.clone(),
            auth: config.auth.clone(),
            environment: config.environment,
            sessions: Arc::new(SessionRegistry::new()),
        }
    }
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let s3_client = config::load_s3_client().await?;
    let state = AppState::new(pool, s3_client, config);

    router(state, config)
}

pub fn router(state: AppState, config: &AppConfig) -> Result<Router> {
    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allowed_origins);

    let app = routes::create_router(&state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(app)
}
