/// Configuration management for the store service
///
/// All settings come from environment variables (a `.env` file is honoured
/// by `main`). Production deployments must set CORS origins and JWT keys
/// explicitly.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Emit JSON log lines instead of human readable ones
    pub json_logs: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Apply pending migrations during startup
    pub run_migrations: bool,
}

/// Token configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub private_key_pem: Option<String>,
    pub public_key_pem: Option<String>,
    pub access_token_ttl_secs: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("private_key_pem", &self.private_key_pem.as_ref().map(|_| "[REDACTED]"))
            .field("public_key_pem", &self.public_key_pem.as_ref().map(|_| "[REDACTED]"))
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .finish()
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if production => {
                return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
            }
            Err(_) => "http://localhost:3000".to_string(),
        };
        if production && allowed_origins.trim() == "*" {
            return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
        }

        let private_key_pem = non_empty_env("JWT_PRIVATE_KEY_PEM");
        let public_key_pem = non_empty_env("JWT_PUBLIC_KEY_PEM");
        if production && (private_key_pem.is_none() || public_key_pem.is_none()) {
            return Err(
                "JWT_PRIVATE_KEY_PEM and JWT_PUBLIC_KEY_PEM must be set in production".to_string(),
            );
        }

        let access_token_ttl_secs = parse_env_or_default("JWT_ACCESS_TOKEN_TTL_SECS", 3600i64)?;
        if access_token_ttl_secs <= 0 {
            return Err("JWT_ACCESS_TOKEN_TTL_SECS must be positive".to_string());
        }

        let max_connections = parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10u32)?;
        let min_connections = parse_env_or_default("DATABASE_MIN_CONNECTIONS", 1u32)?;
        if min_connections > max_connections {
            return Err(format!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                min_connections, max_connections
            ));
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("STORE_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("STORE_SERVICE_PORT", 8080u16)?,
                json_logs: std::env::var("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/store".to_string()),
                max_connections,
                min_connections,
                acquire_timeout_secs: parse_env_or_default("DATABASE_ACQUIRE_TIMEOUT_SECS", 10u64)?,
                run_migrations: parse_bool_env("RUN_MIGRATIONS", true)?,
            },
            auth: AuthConfig {
                private_key_pem,
                public_key_pem,
                access_token_ttl_secs,
            },
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool, String> {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("Failed to parse {}='{}': expected a boolean", key, val)),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "APP_ENV",
        "CORS_ALLOWED_ORIGINS",
        "JWT_PRIVATE_KEY_PEM",
        "JWT_PUBLIC_KEY_PEM",
        "JWT_ACCESS_TOKEN_TTL_SECS",
        "STORE_SERVICE_PORT",
        "DATABASE_MAX_CONNECTIONS",
        "DATABASE_MIN_CONNECTIONS",
        "RUN_MIGRATIONS",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_in_development() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.cors.allowed_origins, "http://localhost:3000");
        assert_eq!(config.auth.access_token_ttl_secs, 3600);
        assert!(config.database.run_migrations);
        assert!(config.auth.private_key_pem.is_none());
    }

    #[test]
    #[serial]
    fn production_requires_cors_and_keys() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://shop.example.com");
        assert!(Config::from_env().is_err());

        std::env::set_var("JWT_PRIVATE_KEY_PEM", "private");
        std::env::set_var("JWT_PUBLIC_KEY_PEM", "public");
        assert!(Config::from_env().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn malformed_numbers_are_rejected() {
        clear_env();
        std::env::set_var("STORE_SERVICE_PORT", "eighty");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("STORE_SERVICE_PORT"));
        clear_env();
    }

    #[test]
    #[serial]
    fn pool_bounds_are_checked() {
        clear_env();
        std::env::set_var("DATABASE_MAX_CONNECTIONS", "2");
        std::env::set_var("DATABASE_MIN_CONNECTIONS", "5");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn migrations_flag_parses_booleans() {
        clear_env();
        std::env::set_var("RUN_MIGRATIONS", "false");
        assert!(!Config::from_env().unwrap().database.run_migrations);

        std::env::set_var("RUN_MIGRATIONS", "maybe");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    fn auth_config_debug_redacts_keys() {
        let auth = AuthConfig {
            private_key_pem: Some("secret".into()),
            public_key_pem: None,
            access_token_ttl_secs: 60,
        };
        let rendered = format!("{:?}", auth);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
