// src/config.rs
use std::env;

use tracing::warn;

/// Environment-derived configuration, loaded once at startup and shared
/// read-only through the application state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expires_in_days: i64,
    pub admin_secret: String,
    pub allowed_origins: Vec<String>,
    pub uploads_dir: String,
    pub asset_host: Option<AssetHostConfig>,
}

/// Remote image host credentials. Only used when all three variables are
/// present; otherwise uploads fall back to local disk.
#[derive(Debug, Clone)]
pub struct AssetHostConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5000);

        let jwt_expires_in_days = env::var("JWT_EXPIRES_IN_DAYS")
            .ok()
            .and_then(|d| d.parse::<i64>().ok())
            .unwrap_or(7);

        let admin_secret = env::var("ADMIN_SECRET").unwrap_or_else(|_| "123456".to_string());

        let allowed_origins =
            parse_origins(&env::var("CLIENT_URL").unwrap_or_else(|_| "*".to_string()));

        let uploads_dir = env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string());

        let asset_host = asset_host_from_env();
        if asset_host.is_none() {
            warn!("Asset host env not fully set; product images will be stored on local disk");
        }

        Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_expires_in_days,
            admin_secret,
            allowed_origins,
            uploads_dir,
            asset_host,
        }
    }
}

fn asset_host_from_env() -> Option<AssetHostConfig> {
    let cloud_name = env::var("CLOUDINARY_CLOUD_NAME").ok()?;
    let api_key = env::var("CLOUDINARY_API_KEY").ok()?;
    let api_secret = env::var("CLOUDINARY_API_SECRET").ok()?;
    Some(AssetHostConfig {
        cloud_name,
        api_key,
        api_secret,
    })
}

/// Comma-separated origin list from CLIENT_URL, whitespace trimmed.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
