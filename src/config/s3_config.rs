use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{Client as S3Client, config::Credentials};

use crate::error::{AppError, Result};

pub async fn load_s3_client() -> Result<S3Client> {
    let aws_access_key = std::env::var("AWS_ACCESS_KEY_ID")
        .map_err(|_| AppError::ConfigError("AWS_ACCESS_KEY_ID not set".to_string()))?;

    let aws_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY")
        .map_err(|_| AppError::ConfigError("AWS_SECRET_ACCESS_KEY not set".to_string()))?;

    let aws_region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

    let credentials = Credentials::new(
        aws_access_key,
        aws_secret_key,
        None,
        None,
        "garb-rent-env",
    );

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(aws_region))
        .credentials_provider(credentials);

    // S3-compatible providers (MinIO, R2) expose a custom endpoint
    if let Ok(endpoint) = std::env::var("S3_ENDPOINT") {
        loader = loader.endpoint_url(endpoint);
    }

    let config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(std::env::var("S3_ENDPOINT").is_ok())
        .build();

    tracing::info!("Storage client initialized");

    Ok(S3Client::from_conf(s3_config))
}
