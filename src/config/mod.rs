use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub quotes: QuoteConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which store implementation backs the models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub store: StoreKind,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PHARMAMATE_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("PHARMAMATE_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("PHARMAMATE_STORE") {
            match v.as_str() {
                "memory" => self.database.store = StoreKind::Memory,
                "postgres" | "pg" => self.database.store = StoreKind::Postgres,
                other => tracing::warn!("Unknown PHARMAMATE_STORE '{}', keeping {:?}", other, self.database.store),
            }
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("SECRET_KEY") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Quote service overrides
        if let Ok(v) = env::var("QUOTES_URL") {
            self.quotes.url = v;
        }
        if let Ok(v) = env::var("QUOTES_TIMEOUT_SECS") {
            self.quotes.timeout_secs = v.parse().unwrap_or(self.quotes.timeout_secs);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            database: DatabaseConfig {
                store: StoreKind::Postgres,
                url: Some("postgresql:///pharmamate".to_string()),
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "secret-dev".to_string(),
                jwt_expiry_hours: 24 * 7,
                cors_origins: vec!["*".to_string()],
            },
            quotes: QuoteConfig {
                url: "https://zenquotes.io/api/random/".to_string(),
                timeout_secs: 5,
            },
        }
    }

    /// In-memory store, fixed secret, no server error logging
    pub fn test() -> Self {
        Self {
            environment: Environment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                store: StoreKind::Memory,
                url: None,
                max_connections: 2,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: "secret-test".to_string(),
                jwt_expiry_hours: 1,
                cors_origins: vec!["*".to_string()],
            },
            quotes: QuoteConfig {
                url: "http://127.0.0.1:9/api/random/".to_string(),
                timeout_secs: 1,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
            },
            database: DatabaseConfig {
                store: StoreKind::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                // Must be supplied through SECRET_KEY
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                cors_origins: Vec::new(),
            },
            quotes: QuoteConfig {
                url: "https://zenquotes.io/api/random/".to_string(),
                timeout_secs: 5,
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.database.store, StoreKind::Postgres);
        assert_eq!(config.server.port, 3001);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_test_config_uses_memory_store() {
        let config = AppConfig::test();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.database.store, StoreKind::Memory);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_production_requires_secret_from_env() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(config.security.cors_origins.is_empty());
    }

    #[test]
    fn test_jwt_secret_not_serialized() {
        let value = serde_json::to_value(AppConfig::development()).unwrap();
        assert!(value["security"].get("jwt_secret").is_none());
        assert_eq!(value["security"]["jwt_expiry_hours"], 168);
    }

    #[test]
    fn test_bind_addr() {
        let mut config = AppConfig::test();
        config.server.port = 4567;
        assert_eq!(config.bind_addr(), "127.0.0.1:4567");
    }

    const ENV_KEYS: &[&str] = &[
        "APP_ENV",
        "PHARMAMATE_HOST",
        "PHARMAMATE_PORT",
        "PORT",
        "PHARMAMATE_STORE",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
        "DATABASE_CONNECTION_TIMEOUT",
        "SECRET_KEY",
        "JWT_EXPIRY_HOURS",
        "SECURITY_CORS_ORIGINS",
        "QUOTES_URL",
        "QUOTES_TIMEOUT_SECS",
    ];

    // The process environment is shared by every test thread
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    /// Clears the config keys for one test and restores them on drop
    struct ScopedEnv {
        saved: Vec<(&'static str, Option<String>)>,
        _lock: std::sync::MutexGuard<'static, ()>,
    }

    impl ScopedEnv {
        fn new(vars: &[(&str, &str)]) -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let saved = ENV_KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();
            for key in ENV_KEYS {
                env::remove_var(key);
            }
            for (key, value) in vars {
                env::set_var(key, value);
            }
            Self { saved, _lock: lock }
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            for (key, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    fn test_from_env_without_overrides_is_development() {
        let _env = ScopedEnv::new(&[]);
        let config = AppConfig::from_env();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.database.store, StoreKind::Postgres);
        assert_eq!(config.security.jwt_secret, "secret-dev");
    }

    #[test]
    fn test_app_env_selects_profile() {
        let _env = ScopedEnv::new(&[("APP_ENV", "prod")]);
        assert_eq!(AppConfig::from_env().environment, Environment::Production);
        env::set_var("APP_ENV", "production");
        assert_eq!(AppConfig::from_env().environment, Environment::Production);
        env::set_var("APP_ENV", "test");
        assert_eq!(AppConfig::from_env().environment, Environment::Test);
        env::set_var("APP_ENV", "staging");
        assert_eq!(AppConfig::from_env().environment, Environment::Development);
    }

    #[test]
    fn test_store_and_database_overrides() {
        let _env = ScopedEnv::new(&[
            ("APP_ENV", "test"),
            ("PHARMAMATE_STORE", "postgres"),
            ("DATABASE_URL", "postgresql://db/pharmamate"),
            ("DATABASE_MAX_CONNECTIONS", "7"),
            ("DATABASE_CONNECTION_TIMEOUT", "soon"),
        ]);
        let config = AppConfig::from_env();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.database.store, StoreKind::Postgres);
        assert_eq!(config.database.url.as_deref(), Some("postgresql://db/pharmamate"));
        assert_eq!(config.database.max_connections, 7);
        assert_eq!(config.database.connection_timeout, 5);

        env::set_var("PHARMAMATE_STORE", "pg");
        assert_eq!(AppConfig::from_env().database.store, StoreKind::Postgres);
        env::set_var("PHARMAMATE_STORE", "memory");
        assert_eq!(AppConfig::from_env().database.store, StoreKind::Memory);
    }

    #[test]
    fn test_unknown_store_keeps_profile_store() {
        let _env = ScopedEnv::new(&[("APP_ENV", "test"), ("PHARMAMATE_STORE", "redis")]);
        assert_eq!(AppConfig::from_env().database.store, StoreKind::Memory);

        env::set_var("APP_ENV", "development");
        assert_eq!(AppConfig::from_env().database.store, StoreKind::Postgres);
    }

    #[test]
    fn test_pharmamate_port_wins_over_port() {
        let _env = ScopedEnv::new(&[
            ("PORT", "8080"),
            ("PHARMAMATE_PORT", "9090"),
            ("PHARMAMATE_HOST", "0.0.0.0"),
        ]);
        assert_eq!(AppConfig::from_env().bind_addr(), "0.0.0.0:9090");

        env::remove_var("PHARMAMATE_PORT");
        assert_eq!(AppConfig::from_env().server.port, 8080);

        env::set_var("PORT", "not-a-port");
        assert_eq!(AppConfig::from_env().server.port, 3001);
    }

    #[test]
    fn test_security_overrides() {
        let _env = ScopedEnv::new(&[
            ("APP_ENV", "production"),
            ("SECRET_KEY", "s3cret"),
            ("JWT_EXPIRY_HOURS", "2"),
            ("SECURITY_CORS_ORIGINS", " https://a.example , ,https://b.example"),
        ]);
        let config = AppConfig::from_env();
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.security.jwt_expiry_hours, 2);
        assert_eq!(
            config.security.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );

        env::set_var("JWT_EXPIRY_HOURS", "forever");
        env::set_var("SECURITY_CORS_ORIGINS", "");
        let config = AppConfig::from_env();
        assert_eq!(config.security.jwt_expiry_hours, 24);
        assert!(config.security.cors_origins.is_empty());
    }

    #[test]
    fn test_quote_overrides() {
        let _env = ScopedEnv::new(&[
            ("QUOTES_URL", "http://quotes.local/random"),
            ("QUOTES_TIMEOUT_SECS", "9"),
        ]);
        let config = AppConfig::from_env();
        assert_eq!(config.quotes.url, "http://quotes.local/random");
        assert_eq!(config.quotes.timeout_secs, 9);
    }
}
