/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可, SECRET_KEY など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Shared with the main system; every app behind the same login signs/verifies with it.
    pub secret_key: String,
    pub jwt_algorithm: String,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub token_leeway_seconds: u64,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the shared secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("auth_issuer", &self.auth_issuer)
            .field("auth_audience", &self.auth_audience)
            .field("token_leeway_seconds", &self.token_leeway_seconds)
            .field("request_timeout", &self.request_timeout)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .finish()
    }
}

impl Config {
    /// Load from `./.env` layered over the process environment.
    ///
    /// Values in `.env` win over variables already set in the process, so a
    /// service-local `.env` pins `SECRET_KEY` even when the host exports another one.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_file(Path::new(".env"), |key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an explicit `.env` path and fallback lookup.
    ///
    /// A missing or unreadable file contributes nothing.
    pub fn from_env_file<F>(path: &Path, fallback: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_vars = read_env_file(path);

        Self::from_vars(|key| file_vars.get(key).cloned().or_else(|| fallback(key)))
    }

    /// Build a `Config` from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the process env.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 5000,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let secret_key = lookup("SECRET_KEY")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let jwt_algorithm = lookup("JWT_ALGORITHM")
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "HS256".to_string());
        if !matches!(jwt_algorithm.as_str(), "HS256" | "HS384" | "HS512") {
            return Err(ConfigError::Invalid("JWT_ALGORITHM"));
        }

        let auth_issuer = non_empty(lookup("AUTH_ISSUER"));
        let auth_audience = non_empty(lookup("AUTH_AUDIENCE"));

        let token_leeway_seconds = parse_or(&lookup, "AUTH_TOKEN_LEEWAY_SECONDS", 30)?;
        let request_timeout =
            Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?);
        let request_body_limit_bytes =
            parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            secret_key,
            jwt_algorithm,
            auth_issuer,
            auth_audience,
            token_leeway_seconds,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}

fn read_env_file(path: &Path) -> HashMap<String, String> {
    match dotenvy::from_path_iter(path) {
        Ok(iter) => iter
            .filter_map(|item| match item {
                Ok(pair) => Some(pair),
                Err(err) => {
                    tracing::warn!(error = %err, path = %path.display(), "skipping bad .env line");
                    None
                }
            })
            .collect(),
        Err(_) => HashMap::new(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("SECRET_KEY", "s3cret")]).unwrap();

        assert_eq!(config.addr.port(), 5000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.jwt_algorithm, "HS256");
        assert_eq!(config.auth_issuer, None);
        assert_eq!(config.token_leeway_seconds, 30);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn secret_key_is_required() {
        assert_eq!(load(&[]).err(), Some(ConfigError::Missing("SECRET_KEY")));
        assert_eq!(
            load(&[("SECRET_KEY", "   ")]).err(),
            Some(ConfigError::Missing("SECRET_KEY"))
        );
    }

    #[test]
    fn parses_overrides() {
        let config = load(&[
            ("SECRET_KEY", "s3cret"),
            ("PORT", "8080"),
            ("APP_ENV", "PROD"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3000, ,https://app.example.com"),
            ("JWT_ALGORITHM", "hs512"),
            ("AUTH_ISSUER", "main-system"),
            ("AUTH_TOKEN_LEEWAY_SECONDS", "5"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:3000", "https://app.example.com"]
        );
        assert_eq!(config.jwt_algorithm, "HS512");
        assert_eq!(config.auth_issuer.as_deref(), Some("main-system"));
        assert_eq!(config.token_leeway_seconds, 5);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            load(&[("SECRET_KEY", "s"), ("PORT", "http")]).err(),
            Some(ConfigError::Invalid("PORT"))
        );
        assert_eq!(
            load(&[("SECRET_KEY", "s"), ("JWT_ALGORITHM", "RS256")]).err(),
            Some(ConfigError::Invalid("JWT_ALGORITHM"))
        );
        assert_eq!(
            load(&[("SECRET_KEY", "s"), ("REQUEST_TIMEOUT_SECONDS", "-1")]).err(),
            Some(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))
        );
    }

    #[test]
    fn env_file_overrides_process_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "SECRET_KEY=from-file\nPORT=8080\n").unwrap();

        let process: HashMap<&str, &str> = [("SECRET_KEY", "from-process"), ("APP_ENV", "prod")]
            .into_iter()
            .collect();
        let config = Config::from_env_file(&path, |key| {
            process.get(key).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.secret_key, "from-file");
        assert_eq!(config.addr.port(), 8080);
        // Keys absent from the file still come from the process.
        assert!(config.app_env.is_production());
    }

    #[test]
    fn missing_env_file_falls_back_to_process_environment() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::from_env_file(&dir.path().join(".env"), |key| {
            (key == "SECRET_KEY").then(|| "from-process".to_string())
        })
        .unwrap();

        assert_eq!(config.secret_key, "from-process");
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = load(&[("SECRET_KEY", "do-not-print")]).unwrap();
        assert!(!format!("{config:?}").contains("do-not-print"));
    }
}
