use crate::auth::jwt::JwtConfig;

/// Which review repository adapter to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process map; state is lost on restart.
    Memory,
    /// Durable Postgres adapter; requires `DATABASE_URL`.
    Postgres,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on review creation inside the HITL interceptor, in
    /// milliseconds (default: `2000`). Past it, the analysis response is
    /// delivered with a `reviewError` annotation instead of hanging.
    pub review_create_timeout_ms: u64,
    /// Review repository adapter (default: memory).
    pub store: StoreBackend,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `REVIEW_CREATE_TIMEOUT_MS` | `2000`                     |
    /// | `REVIEW_STORE`             | `memory`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let review_create_timeout_ms: u64 = std::env::var("REVIEW_CREATE_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".into())
            .parse()
            .expect("REVIEW_CREATE_TIMEOUT_MS must be a valid u64");

        let store = match std::env::var("REVIEW_STORE")
            .unwrap_or_else(|_| "memory".into())
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres,
            other => panic!("REVIEW_STORE must be 'memory' or 'postgres', got '{other}'"),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            review_create_timeout_ms,
            store,
            jwt,
        }
    }
}
