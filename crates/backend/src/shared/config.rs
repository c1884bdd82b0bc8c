use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub sales_data: SalesDataConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SalesDataConfig {
    /// Spreadsheet file name inside the data directory
    pub file_name: String,
    /// Data directory; the `DATA_PATH` environment variable takes precedence
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Environment variable overriding the data directory
pub const DATA_PATH_ENV: &str = "DATA_PATH";

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[sales_data]
file_name = "product-sales.xlsx"
"#;

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Directory holding the sales file
///
/// Resolution order: `DATA_PATH`, then `sales_data.data_dir`, then the
/// current directory.
pub fn get_data_dir(config: &SalesDataConfig) -> anyhow::Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_PATH_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }
    Ok(std::env::current_dir()?)
}
