use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

/// Process-wide configuration: loaded and validated once at startup,
/// then passed explicitly to whoever needs it.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Token signing settings. `secret_key` has no default on purpose: a
/// deployment must provide one via TOML or the SECRET_KEY env var.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_token_expire_minutes")]
    pub access_token_expire_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            algorithm: default_algorithm(),
            access_token_expire_minutes: default_token_expire_minutes(),
        }
    }
}

/// Lifecycle policy knobs.
///
/// `enforce_cancel_ownership = false` keeps the legacy behavior where any
/// client-role caller may cancel any service; turning it on restricts
/// cancellation to the service's own client.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LifecycleConfig {
    #[serde(default)]
    pub enforce_cancel_ownership: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_algorithm() -> String { "HS256".to_string() }
fn default_token_expire_minutes() -> u64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load config.toml (falling back to pure env configuration when the
    /// file is absent), apply env overrides, then validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.lifecycle.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse::<u16>() {
                self.port = p;
            }
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // TOML wins; DATABASE_URL fills the gap when the file omits it
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or via DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.secret_key.trim().is_empty() {
            if let Ok(secret) = std::env::var("SECRET_KEY") {
                self.secret_key = secret;
            }
        }
        if let Ok(alg) = std::env::var("ALGORITHM") {
            if !alg.trim().is_empty() {
                self.algorithm = alg;
            }
        }
        if let Ok(mins) = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            if let Ok(m) = mins.parse::<u64>() {
                self.access_token_expire_minutes = m;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret_key.trim().is_empty() {
            return Err(anyhow!("auth.secret_key is empty; set it in config.toml or via SECRET_KEY"));
        }
        if self.access_token_expire_minutes == 0 {
            return Err(anyhow!("auth.access_token_expire_minutes must be >= 1"));
        }
        Ok(())
    }
}

impl LifecycleConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(v) = std::env::var("ENFORCE_CANCEL_OWNERSHIP") {
            self.enforce_cancel_ownership = matches!(v.as_str(), "1" | "true" | "yes");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_expected_surface() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.auth.algorithm, "HS256");
        assert_eq!(cfg.auth.access_token_expire_minutes, 30);
        assert!(!cfg.lifecycle.enforce_cancel_ownership);
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn parses_full_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "postgres://u:p@localhost/ridehail"

            [auth]
            secret_key = "not-a-real-secret"
            access_token_expire_minutes = 5

            [lifecycle]
            enforce_cancel_ownership = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.auth.access_token_expire_minutes, 5);
        assert!(cfg.lifecycle.enforce_cancel_ownership);
        assert!(cfg.database.validate().is_ok());
    }

    #[test]
    fn rejects_non_postgres_url() {
        let db = DatabaseConfig { url: "mysql://nope".into(), ..Default::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_empty_secret() {
        let auth = AuthConfig { secret_key: "  ".into(), ..Default::default() };
        assert!(auth.validate().is_err());
    }
}
