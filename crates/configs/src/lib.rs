use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    /// username -> password (plaintext or argon2 PHC string)
    #[serde(default)]
    pub admins: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Mount `/add_key` and `/remove_key` (credentials in query string).
    #[serde(default)]
    pub legacy_endpoints: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 5000, worker_threads: Some(4), legacy_endpoints: false }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
    Database,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "memory" | "mem" => Ok(Self::Memory),
            "database" | "db" | "postgres" => Ok(Self::Database),
            other => Err(anyhow!("unknown storage backend `{other}` (expected file, memory or database)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::File, path: default_storage_path() }
    }
}

fn default_storage_path() -> String { "data/keys.json".into() }

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// HMAC secret for session tokens. Required.
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { secret: String::new(), ttl_secs: default_session_ttl(), secure_cookie: false }
    }
}

fn default_session_ttl() -> u64 { 12 * 60 * 60 }

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`) if present, overlay the process
    /// environment and validate. A missing file is not an error; a missing
    /// secret or admin table is.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path).map_err(|e| anyhow!("cannot read config file {path}: {e}"))?
        } else {
            AppConfig::default()
        };
        cfg.apply_env(|name| std::env::var(name).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay settings from environment variables. Set variables win over
    /// the file.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(secret) = get("APP_SECRET_KEY") {
            self.session.secret = secret;
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|_| anyhow!("PORT must be an integer in 1..=65535, got `{port}`"))?;
        }
        if let Some(w) = get("TOKIO_WORKER_THREADS") {
            self.server.worker_threads = Some(w.trim().parse().map_err(|_| anyhow!("TOKIO_WORKER_THREADS must be a positive integer"))?);
        }
        if let Some(flag) = get("LEGACY_ENDPOINTS") {
            self.server.legacy_endpoints = parse_flag("LEGACY_ENDPOINTS", &flag)?;
        }
        if let Some(backend) = get("KEY_STORE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(path) = get("KEY_STORE_PATH") {
            self.storage.path = path;
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(ttl) = get("SESSION_TTL_SECS") {
            self.session.ttl_secs = ttl.trim().parse().map_err(|_| anyhow!("SESSION_TTL_SECS must be a positive integer"))?;
        }
        if let Some(flag) = get("SESSION_SECURE_COOKIE") {
            self.session.secure_cookie = parse_flag("SESSION_SECURE_COOKIE", &flag)?;
        }
        if let Some(list) = get("ADMIN_CREDENTIALS") {
            for pair in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (user, pass) = pair
                    .split_once(':')
                    .ok_or_else(|| anyhow!("ADMIN_CREDENTIALS entries must look like user:password"))?;
                self.admins.insert(user.trim().to_string(), pass.to_string());
            }
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        if self.storage.backend == StorageBackend::Database {
            self.database.validate()?;
        }
        self.session.validate()?;
        if self.admins.is_empty() {
            return Err(anyhow!("no admin credentials configured; set [admins] in config.toml or ADMIN_CREDENTIALS"));
        }
        for (user, pass) in &self.admins {
            if user.trim().is_empty() || pass.is_empty() {
                return Err(anyhow!("admin credentials must have a non-empty username and password"));
            }
        }
        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{name} must be a boolean, got `{value}`")),
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::File && self.path.trim().is_empty() {
            return Err(anyhow!("storage.path is empty; set it in config.toml or KEY_STORE_PATH"));
        }
        Ok(())
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<()> {
        if self.secret.trim().is_empty() {
            return Err(anyhow!("session secret is not set; provide APP_SECRET_KEY (refusing to start without it)"));
        }
        if self.ttl_secs == 0 {
            return Err(anyhow!("session.ttl_secs must be > 0"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
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
