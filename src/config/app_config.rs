use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub environment: Environment,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Whether self-registration may request the admin role.
    pub allow_admin_signup: bool,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub assets_url: String,
    pub upload_expiry_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Staging,
    Main,
}

impl Environment {
    pub fn image_prefix(&self) -> &'static str {
        match self {
            Environment::Staging => "products-staging",
            Environment::Main => "products-main",
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", "3000")?,
                max_body_size: parse_var("MAX_BODY_SIZE", "1048576")?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: parse_var("DB_MAX_CONNECTIONS", "20")?,
            },
            cors: CorsConfig {
                allowed_origins: split_origins(&env::var("FRONTEND_URL")?),
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET")
                    .map_err(|_| AppError::ConfigError("JWT_SECRET not set".to_string()))?,
                token_ttl_hours: parse_var("JWT_TTL_HOURS", "24")?,
                allow_admin_signup: parse_var("ALLOW_ADMIN_SIGNUP", "false")?,
            },
            storage: StorageConfig {
                bucket: env::var("S3_BUCKET")
                    .map_err(|_| AppError::ConfigError("S3_BUCKET not set".to_string()))?,
                assets_url: env::var("ASSETS_URL")?.trim_end_matches('/').to_string(),
                upload_expiry_secs: parse_var("UPLOAD_URL_EXPIRY_SECS", "900")?,
            },
            environment: parse_environment(
                &env::var("ENVIRONMENT").unwrap_or_else(|_| "staging".to_string()),
            )?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::ConfigError(format!("Invalid {} value", key)))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_environment(raw: &str) -> Result<Environment> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "staging" => Ok(Environment::Staging),
        "main" | "production" => Ok(Environment::Main),
        other => Err(AppError::ConfigError(format!(
            "Invalid ENVIRONMENT value: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_origins() {
        let origins = split_origins("http://localhost:5173, https://garb.example.com ,");
        assert_eq!(
            origins,
            vec!["http://localhost:5173", "https://garb.example.com"]
        );
    }

    #[test]
    fn parses_environment_names() {
        assert_eq!(parse_environment("staging").unwrap(), Environment::Staging);
        assert_eq!(parse_environment("MAIN").unwrap(), Environment::Main);
        assert_eq!(parse_environment("production").unwrap(), Environment::Main);
        assert!(parse_environment("dev").is_err());
    }

    #[test]
    fn image_prefix_follows_environment() {
        assert_eq!(Environment::Staging.image_prefix(), "products-staging");
        assert_eq!(Environment::Main.image_prefix(), "products-main");
    }
}
