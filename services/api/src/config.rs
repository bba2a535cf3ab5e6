//! API service configuration
//!
//! All settings are read from environment variables once at startup, with
//! development defaults. Database settings live in `common::database`.

use std::env;
use std::path::PathBuf;

/// Runtime configuration for the marketplace API service
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Public origin used to absolutize stored image paths
    pub public_base_url: String,
    /// Directory uploaded images are written to and served from
    pub upload_dir: PathBuf,
    /// Allow-listed CORS origins
    pub cors_origins: Vec<String>,
    /// Reservoir API base URL
    pub reservoir_base_url: String,
    /// Optional Reservoir API key
    pub reservoir_api_key: Option<String>,
    /// Moralis API base URL
    pub moralis_base_url: String,
    /// Optional Moralis API key
    pub moralis_api_key: Option<String>,
}

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string());
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4000".to_string());
        let upload_dir = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".to_string())
            .into();
        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let reservoir_base_url = env::var("RESERVOIR_BASE_URL")
            .unwrap_or_else(|_| "https://api.reservoir.tools".to_string());
        let reservoir_api_key = env::var("RESERVOIR_API_KEY").ok().filter(|s| !s.is_empty());

        let moralis_base_url = env::var("MORALIS_BASE_URL")
            .unwrap_or_else(|_| "https://deep-index.moralis.io/api/v2.2".to_string());
        let moralis_api_key = env::var("MORALIS_API_KEY").ok().filter(|s| !s.is_empty());

        Self {
            bind_addr,
            public_base_url,
            upload_dir,
            cors_origins,
            reservoir_base_url,
            reservoir_api_key,
            moralis_base_url,
            moralis_api_key,
        }
    }
}

/// Split a comma-separated origin list, dropping empty entries
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_splits_and_trims() {
        let origins = parse_origins("http://localhost:3000, http://localhost:5173 ,");
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string()
            ]
        );
    }

    #[test]
    fn parse_origins_empty_input() {
        assert!(parse_origins("").is_empty());
    }
}
