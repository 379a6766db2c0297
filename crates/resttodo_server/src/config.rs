//! Server configuration.
//!
//! Every value has a fixed default; the binary never reads environment
//! variables or flags. Tests override fields through the builder.

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_PATH: &str = "todos.db";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// SQLite database file, created on first start.
    pub db_path: PathBuf,
    /// Directory holding `index.html` and other static assets.
    pub static_dir: PathBuf,
    /// Log level name understood by `resttodo_core::init_logging`.
    pub log_level: String,
    /// Absolute directory for rotating log files. `None` logs to stderr only.
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            static_dir: default_static_dir(),
            log_level: resttodo_core::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    db_path: Option<PathBuf>,
    static_dir: Option<PathBuf>,
    log_level: Option<String>,
    log_dir: Option<String>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets the database file path.
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Sets the static asset directory.
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Sets the log file directory.
    pub fn log_dir(mut self, dir: impl Into<String>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Builds the server config.
    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            db_path: self.db_path.unwrap_or(defaults.db_path),
            static_dir: self.static_dir.unwrap_or(defaults.static_dir),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            log_dir: self.log_dir.or(defaults.log_dir),
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;
    use std::path::PathBuf;

    #[test]
    fn defaults_listen_on_all_interfaces_port_5000() {
        let config = ServerConfig::default();
        assert_eq!(config.addr.to_string(), "0.0.0.0:5000");
        assert_eq!(config.db_path, PathBuf::from("todos.db"));
        assert!(config.static_dir.ends_with("static"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn builder_overrides_only_given_fields() {
        let config = ServerConfig::builder()
            .db_path("/tmp/other.db")
            .log_level("warn")
            .build();
        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.addr.port(), 5000);
    }
}
