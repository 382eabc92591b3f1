use aws_sdk_s3 as s3;
use aws_sdk_s3::presigning::PresigningConfig;
use std::time::Duration;
use uuid::Uuid;

use crate::{
    config::Environment,
    error::{AppError, Result},
};

pub fn product_image_key(environment: Environment, extension: &str) -> String {
    format!(
        "{}/{}.{}",
        environment.image_prefix(),
        Uuid::new_v4(),
        extension
    )
}

pub fn public_url(assets_url: &str, key: &str) -> String {
    format!("{}/{}", assets_url, key)
}

/// Recovers the object key from a public URL we issued, if it is one.
pub fn key_from_public_url<'a>(assets_url: &str, url: &'a str) -> Option<&'a str> {
    url.strip_prefix(assets_url)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| !key.is_empty())
}

pub async fn put_object_url(
    client: &s3::Client,
    bucket: &str,
    object: &str,
    content_type: &str,
    expires_in: u64,
) -> Result<String> {
    let presigning = PresigningConfig::expires_in(Duration::from_secs(expires_in))
        .map_err(|e| AppError::InternalError(format!("Invalid presign expiry: {}", e)))?;

    let presigned_request = client
        .put_object()
        .bucket(bucket)
        .key(object)
        .content_type(content_type)
        .presigned(presigning)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to generate presigned URL: {}", e)))?;

    Ok(presigned_request.uri().into())
}

pub async fn delete_single_object(client: &s3::Client, bucket: &str, key: &str) -> Result<()> {
    client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to delete image: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_live_under_environment_prefix() {
        let key = product_image_key(Environment::Main, "png");
        assert!(key.starts_with("products-main/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn recovers_key_from_own_urls_only() {
        let assets = "https://cdn.example.com";
        let url = public_url(assets, "products-main/a.png");

        assert_eq!(key_from_public_url(assets, &url), Some("products-main/a.png"));
        assert_eq!(key_from_public_url(assets, "https://elsewhere.com/a.png"), None);
        assert_eq!(key_from_public_url(assets, "https://cdn.example.com/"), None);
    }
}
