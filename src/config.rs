use std::fmt;

/// Runtime settings read from the environment (and `.env`, via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Raw `SESSION_KEY`; `None` when unset or shorter than 64 bytes.
    pub session_key: Option<Vec<u8>>,
    pub cookie_secure: bool,
    /// Always positive and within Postgres `make_interval` range.
    pub audit_retention_days: i32,
    pub admin_password: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid(key, value) => write!(f, "{key} has an invalid value: '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_AUDIT_RETENTION_DAYS: i32 = 90;
const MIN_SESSION_KEY_LEN: usize = 64;

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Could not read .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let session_key = match get("SESSION_KEY") {
            Some(val) if val.len() >= MIN_SESSION_KEY_LEN => Some(val.into_bytes()),
            Some(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need {MIN_SESSION_KEY_LEN}+), generating random key",
                    val.len()
                );
                None
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                None
            }
        };

        let cookie_secure = match get("COOKIE_SECURE").as_deref().map(str::trim) {
            None | Some("") => false,
            Some("1") | Some("true") => true,
            Some("0") | Some("false") => false,
            Some(other) => return Err(ConfigError::Invalid("COOKIE_SECURE", other.to_string())),
        };

        let audit_retention_days = match get("AUDIT_RETENTION_DAYS") {
            None => DEFAULT_AUDIT_RETENTION_DAYS,
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|d| *d > 0)
                .ok_or(ConfigError::Invalid("AUDIT_RETENTION_DAYS", raw))?,
        };

        let admin_password = get("ADMIN_PASSWORD").unwrap_or_else(|| "admin123".to_string());

        Ok(AppConfig {
            database_url,
            bind_addr,
            session_key,
            cookie_secure,
            audit_retention_days,
            admin_password,
        })
    }
}
