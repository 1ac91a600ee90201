use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
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
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Which persistence gateway backs the services.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    Memory,
}

impl DatabaseBackend {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DatabaseBackend::Postgres),
            "memory" => Ok(DatabaseBackend::Memory),
            other => Err(anyhow!("unknown database backend `{other}` (expected postgres or memory)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: DatabaseBackend,
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

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Allowed origins and methods for one group of routes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CorsPolicy {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,
}

impl CorsPolicy {
    pub fn for_origin(origin: &str) -> Self {
        Self { allowed_origins: vec![origin.to_string()], allowed_methods: default_methods() }
    }

    /// `*` anywhere in the origin list opens the policy to every origin.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o.trim() == "*")
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.allowed_origins.is_empty() {
            return Err(anyhow!("cors.{name}.allowed_origins must not be empty"));
        }
        if self.allowed_methods.is_empty() {
            return Err(anyhow!("cors.{name}.allowed_methods must not be empty"));
        }
        Ok(())
    }
}

fn default_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE"].iter().map(|m| m.to_string()).collect()
}

/// Product and user routes carry independent allow-lists.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CorsConfig {
    #[serde(default = "default_producto_policy")]
    pub producto: CorsPolicy,
    #[serde(default = "default_usuario_policy")]
    pub usuario: CorsPolicy,
}

fn default_producto_policy() -> CorsPolicy { CorsPolicy::for_origin("http://localhost:63342") }
fn default_usuario_policy() -> CorsPolicy { CorsPolicy::for_origin("http://localhost:3000") }

impl Default for CorsConfig {
    fn default() -> Self {
        Self { producto: default_producto_policy(), usuario: default_usuario_policy() }
    }
}

impl CorsConfig {
    /// Override origin lists from `CORS_PRODUCTO_ORIGINS` / `CORS_USUARIO_ORIGINS`.
    pub fn apply_env(&mut self) {
        if let Some(list) = env_list("CORS_PRODUCTO_ORIGINS") {
            self.producto.allowed_origins = list;
        }
        if let Some(list) = env_list("CORS_USUARIO_ORIGINS") {
            self.usuario.allowed_origins = list;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.producto.validate("producto")?;
        self.usuario.validate("usuario")
    }
}

fn env_list(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let list = split_list(&raw);
    if list.is_empty() { None } else { Some(list) }
}

/// Split a comma separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>().is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config purely from environment variables, for deployments
    /// without a config file.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        cfg
    }

    /// File config if present, otherwise environment only; validated either way.
    pub fn load_or_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_or_env_from(&path)
    }

    /// Only a missing file falls back to the environment; a file that
    /// cannot be read or parsed is an error.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("failed to load config file `{path}`"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env()?;
        self.database.validate()?;
        self.cors.apply_env();
        self.cors.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var("DATABASE_BACKEND") {
            self.backend = DatabaseBackend::parse(&raw)?;
        }
        // URL from the environment only when the file leaves it empty
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == DatabaseBackend::Memory {
            return Ok(());
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_per_controller_origins() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.cors.producto.allowed_origins, vec!["http://localhost:63342"]);
        assert_eq!(cfg.cors.usuario.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(cfg.cors.usuario.allowed_methods, vec!["GET", "POST", "PUT", "DELETE"]);
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn parses_full_toml() {
        let cfg = load_from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "postgres://u:p@localhost:5432/tienda"
            max_connections = 5

            [cors.producto]
            allowed_origins = ["*"]

            [cors.usuario]
            allowed_origins = ["https://app.example.com"]
            allowed_methods = ["GET"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.backend, DatabaseBackend::Postgres);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.min_connections, 2);
        assert!(cfg.cors.producto.allows_any_origin());
        assert_eq!(cfg.cors.producto.allowed_methods.len(), 4);
        assert_eq!(cfg.cors.usuario.allowed_methods, vec!["GET"]);
        assert!(!cfg.cors.usuario.allows_any_origin());
    }

    #[test]
    fn missing_cors_section_uses_defaults() {
        let cfg = load_from_str("[server]\nhost = \"h\"\nport = 1\n").unwrap();
        assert_eq!(cfg.cors, CorsConfig::default());
    }

    #[test]
    fn database_validation_rules() {
        let mut db = DatabaseConfig { url: "mysql://x".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
        db.url = "postgres://localhost/db".into();
        assert!(db.validate().is_ok());
        db.max_connections = 0;
        assert!(db.validate().is_err());

        let memory = DatabaseConfig { backend: DatabaseBackend::Memory, ..DatabaseConfig::default() };
        assert!(memory.validate().is_ok());
    }

    #[test]
    fn missing_database_section_keeps_pool_defaults() {
        let cfg = load_from_str("").unwrap();
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.database.min_connections, 2);
        assert_eq!(cfg.database.acquire_timeout_secs, 30);
    }

    #[test]
    fn backend_parse() {
        assert_eq!(DatabaseBackend::parse("Memory").unwrap(), DatabaseBackend::Memory);
        assert_eq!(DatabaseBackend::parse("postgresql").unwrap(), DatabaseBackend::Postgres);
        assert!(DatabaseBackend::parse("sqlite").is_err());
    }

    #[test]
    fn server_normalize_fills_threads_and_rejects_zero_port() {
        let mut s = ServerConfig { host: " ".into(), port: 80, worker_threads: Some(0) };
        s.normalize().unwrap();
        assert_eq!(s.host, "127.0.0.1");
        assert_eq!(s.worker_threads, Some(4));
        s.port = 0;
        assert!(s.normalize().is_err());
    }

    #[test]
    fn cors_policy_requires_origins() {
        let mut cors = CorsConfig::default();
        assert!(cors.validate().is_ok());
        cors.usuario.allowed_origins.clear();
        assert!(cors.validate().is_err());
    }

    fn temp_config(tag: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("tienda-config-{}-{tag}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let path = temp_config("malformed", "[server]\nport = \"not a number\"\n");
        let res = AppConfig::load_or_env_from(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        let err = res.unwrap_err();
        assert!(err.to_string().contains("failed to load config file"));
    }

    #[test]
    fn readable_config_file_is_used() {
        let path = temp_config(
            "valid",
            "[server]\nhost = \"127.0.0.1\"\nport = 9100\n\n[database]\nbackend = \"memory\"\n",
        );
        let res = AppConfig::load_or_env_from(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        let cfg = res.unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.database.backend, DatabaseBackend::Memory);
    }

    #[test]
    fn missing_config_file_is_not_found() {
        let path = std::env::temp_dir().join(format!("tienda-config-{}-absent.toml", std::process::id()));
        let err = load_from_file(path.to_str().unwrap()).unwrap_err();
        assert!(is_not_found(&err));
        assert!(!is_not_found(&load_from_str("port = [").unwrap_err()));
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list(" a, ,b ,"), vec!["a", "b"]);
        assert!(split_list("").is_empty());
    }
}
