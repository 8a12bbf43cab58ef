//! Service configuration.
//!
//! Loaded from environment variables at startup. Any invalid or
//! missing required value is an error; `main` propagates it so the
//! process exits instead of serving with a broken configuration.

/// Minimum accepted JWT secret length.
pub const MIN_JWT_SECRET_LEN: usize = 10;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar {
        /// The variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The JWT secret is too short to sign tokens with.
    #[error("JWT_SECRET must be at least 10 characters")]
    WeakJwtSecret,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port to listen on (default: 3001).
    pub port: u16,

    /// CORS allowed origins; `*` means any origin.
    pub cors_origins: Vec<String>,

    /// Shared secret for signing and verifying JWTs.
    pub jwt_secret: String,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum request body size in bytes (default: 1 MiB).
    pub max_body_bytes: usize,

    /// Request timeout in seconds (default: 30).
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is absent,
    /// a value fails to parse, or the JWT secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = require_var("JWT_SECRET")?;
        if jwt_secret.chars().count() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakJwtSecret);
        }

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => compose_database_url()?,
        };

        Ok(Self {
            port: parse_var("PORT", 3001)?,
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".into()),
            ),
            jwt_secret,
            database_url,
            max_body_bytes: parse_var("MAX_BODY_BYTES", 1024 * 1024)?,
            request_timeout_seconds: parse_var("REQUEST_TIMEOUT_SECONDS", 30)?,
        })
    }

    /// Socket address string to bind the listener on.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Build a connection URL from the individual `DB_*` / `POSTGRES_*`
/// variables when `DATABASE_URL` is not provided.
fn compose_database_url() -> Result<String, ConfigError> {
    let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into());
    let port: u16 = parse_var("DB_PORT", 5432)?;
    let name = require_var("POSTGRES_DB")?;
    let user = require_var("POSTGRES_USER")?;
    let password = require_var("POSTGRES_PASSWORD")?;
    Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins("http://a.example, http://b.example ,"),
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
    }

    #[test]
    fn wildcard_origin_passes_through() {
        assert_eq!(parse_origins("*"), vec!["*".to_string()]);
    }
}
