use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Default minimum password length for self-registration.
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
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
    /// Public origin used to build absolute media URLs.
    pub public_base_url: String,
    /// URL prefix media files are served under (default: `/media/`).
    pub media_url: String,
    /// Directory media files are served from and uploaded into (default: `./media`).
    pub media_root: PathBuf,
    /// Minimum accepted password length on registration.
    pub min_password_length: usize,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `PUBLIC_BASE_URL`         | `http://localhost:3000`    |
    /// | `MEDIA_URL`               | `/media/`                  |
    /// | `MEDIA_ROOT`              | `./media`                  |
    /// | `MIN_PASSWORD_LENGTH`     | `8`                        |
    /// | `JWT_SECRET`              | required                   |
    /// | `JWT_ACCESS_EXPIRY_MINS`  | `60`                       |
    /// | `JWT_REFRESH_EXPIRY_DAYS` | `7`                        |
    ///
    /// # Panics
    ///
    /// On a missing `JWT_SECRET` or any value that fails to parse.
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:3000"),
            media_url: env_or("MEDIA_URL", "/media/"),
            media_root: PathBuf::from(env_or("MEDIA_ROOT", "./media")),
            min_password_length: env_parse("MIN_PASSWORD_LENGTH", DEFAULT_MIN_PASSWORD_LENGTH),
            jwt: JwtConfig {
                secret,
                access_token_expiry_mins: env_parse("JWT_ACCESS_EXPIRY_MINS", 60),
                refresh_token_expiry_days: env_parse("JWT_REFRESH_EXPIRY_DAYS", 7),
            },
        }
    }

    /// Route path media is mounted at (`/media`), or `None` when serving is
    /// disabled by an empty `MEDIA_URL`.
    pub fn media_mount_path(&self) -> Option<String> {
        let trimmed = self.media_url.trim_matches('/');
        (!trimmed.is_empty()).then(|| format!("/{trimmed}"))
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_media_url(media_url: &str) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            public_base_url: "http://localhost".into(),
            media_url: media_url.into(),
            media_root: PathBuf::from("./media"),
            min_password_length: 8,
            jwt: JwtConfig {
                secret: "s".into(),
                access_token_expiry_mins: 15,
                refresh_token_expiry_days: 7,
            },
        }
    }

    #[test]
    fn media_mount_path_normalizes_slashes() {
        assert_eq!(config_with_media_url("/media/").media_mount_path().as_deref(), Some("/media"));
        assert_eq!(config_with_media_url("uploads").media_mount_path().as_deref(), Some("/uploads"));
        assert_eq!(config_with_media_url("/").media_mount_path(), None);
        assert_eq!(config_with_media_url("").media_mount_path(), None);
    }
}
