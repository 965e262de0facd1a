//! Configuration module
//!
//! All settings are resolved from the environment exactly once at startup
//! into an immutable `Config`. Object-store settings accept two naming
//! schemes (an explicit `S3_*`/`AWS_*` scheme and the bare names some
//! hosting providers inject); each setting is an ordered list of candidate
//! variables, first non-empty wins.

use std::env;

const DEFAULT_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const UPLOAD_URL_TTL_SECS: u64 = 3600;
const DOWNLOAD_URL_TTL_SECS: u64 = 3600;

/// Application configuration, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    // Object store
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    // Signed URL lifetimes
    pub upload_url_ttl_secs: u64,
    pub download_url_ttl_secs: u64,
}

/// Return the first non-empty value among the candidate variable names.
fn env_first(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| env::var(name).ok().filter(|v| !v.trim().is_empty()))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env_first(&["PRINTDESK_DATABASE_URL", "DATABASE_URL"]).ok_or_else(
                || anyhow::anyhow!("PRINTDESK_DATABASE_URL or DATABASE_URL must be set"),
            )?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            bucket: env_first(&["S3_BUCKET", "BUCKET"])
                .ok_or_else(|| anyhow::anyhow!("S3_BUCKET or BUCKET must be set"))?,
            region: env_first(&["S3_REGION", "AWS_REGION", "REGION"])
                .ok_or_else(|| anyhow::anyhow!("S3_REGION, AWS_REGION, or REGION must be set"))?,
            endpoint: env_first(&["S3_ENDPOINT", "ENDPOINT"]),
            access_key_id: env_first(&["AWS_ACCESS_KEY_ID", "ACCESS_KEY_ID"]),
            secret_access_key: env_first(&["AWS_SECRET_ACCESS_KEY", "SECRET_ACCESS_KEY"]),
            upload_url_ttl_secs: env::var("UPLOAD_URL_TTL_SECS")
                .unwrap_or_else(|_| UPLOAD_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(UPLOAD_URL_TTL_SECS),
            download_url_ttl_secs: env::var("DOWNLOAD_URL_TTL_SECS")
                .unwrap_or_else(|_| DOWNLOAD_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(DOWNLOAD_URL_TTL_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "Database URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        // Credentials must come in pairs; a lone half is a misconfiguration
        // that would otherwise surface as opaque signing failures later.
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(anyhow::anyhow!(
                "Access key id and secret access key must both be set or both be absent"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            database_url: "postgresql://localhost/printdesk".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            bucket: "printdesk-files".to_string(),
            region: "us-west-1".to_string(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            upload_url_ttl_secs: 3600,
            download_url_ttl_secs: 3600,
        }
    }

    #[test]
    fn test_validate_accepts_development_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = base_config();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wildcard_cors_in_production() {
        let mut config = base_config();
        config.environment = "production".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("CORS_ORIGINS"));
    }

    #[test]
    fn test_validate_rejects_half_credential_pair() {
        let mut config = base_config();
        config.access_key_id = Some("AKIA123".to_string());
        assert!(config.validate().is_err());
        config.secret_access_key = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_first_prefers_earlier_names() {
        // Serialize env mutation within this test only.
        env::set_var("PD_TEST_PRIMARY", "first");
        env::set_var("PD_TEST_FALLBACK", "second");
        assert_eq!(
            env_first(&["PD_TEST_PRIMARY", "PD_TEST_FALLBACK"]),
            Some("first".to_string())
        );

        env::set_var("PD_TEST_PRIMARY", "");
        assert_eq!(
            env_first(&["PD_TEST_PRIMARY", "PD_TEST_FALLBACK"]),
            Some("second".to_string()),
            "empty values fall through to the next candidate"
        );

        env::remove_var("PD_TEST_PRIMARY");
        env::remove_var("PD_TEST_FALLBACK");
        assert_eq!(env_first(&["PD_TEST_PRIMARY", "PD_TEST_FALLBACK"]), None);
    }

    #[test]
    fn test_is_production() {
        let mut config = base_config();
        assert!(!config.is_production());
        config.environment = "PROD".to_string();
        assert!(config.is_production());
    }
}
