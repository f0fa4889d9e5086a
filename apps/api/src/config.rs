use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// HMAC secret for session JWTs.
    pub secret_key: String,
    /// GloVe-format embeddings file. Nearest-word lookup is a no-op without it.
    pub embeddings_path: Option<String>,
    pub cors_origin: String,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_upload_mb = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<usize>()
            .context("MAX_UPLOAD_MB must be a whole number of megabytes")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            secret_key: require_env("SECRET_KEY")?,
            embeddings_path: std::env::var("EMBEDDINGS_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            cookie_secure: parse_flag(std::env::var("COOKIE_SECURE").ok().as_deref()),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

#[cfg(test)]
impl Config {
    /// Configuration for tests that never touch external services.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/questionmaker_test".to_string(),
            redis_url: "redis://127.0.0.1/".to_string(),
            s3_bucket: "questionmaker-test".to_string(),
            s3_endpoint: "http://127.0.0.1:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            secret_key: "test-secret-key".to_string(),
            embeddings_path: None,
            cors_origin: "http://localhost:5173".to_string(),
            cookie_secure: false,
            max_upload_bytes: 1024 * 1024,
            port: 3000,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_truthy_values() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some(" YES ")));
        assert!(parse_flag(Some("1")));
    }

    #[test]
    fn test_parse_flag_defaults_to_false() {
        assert!(!parse_flag(None));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(Some("maybe")));
    }
}
