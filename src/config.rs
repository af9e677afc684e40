use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://legendary-memory-rose.vercel.app";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// 存储连接字符串
    pub uri: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "memory://".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}

/// 可由环境变量覆盖的配置项
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    #[serde(alias = "mongodb_uri")]
    pub store_uri: Option<String>,
    pub cors_allowed_origin: Option<String>,
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Invalid allowed origin: {0}")]
    InvalidOrigin(String),
}

impl Config {
    /// 依次加载默认值、config.toml、.env 与进程环境变量
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        let mut config = Self::from_file(DEFAULT_CONFIG_PATH)?;
        config.apply_env(envy::from_env::<EnvOverrides>()?);
        Ok(config)
    }

    // 文件不存在时使用默认配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }

    pub fn apply_env(&mut self, env: EnvOverrides) {
        if let Some(host) = env.host {
            self.server.host = host;
        }
        if let Some(port) = env.port {
            self.server.port = port;
        }
        if let Some(uri) = env.store_uri {
            self.store.uri = uri;
        }
        if let Some(origin) = env.cors_allowed_origin {
            self.cors.allowed_origin = origin;
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|_| ConfigError::InvalidAddress(addr))
    }

    pub fn allowed_origin(&self) -> Result<http::HeaderValue, ConfigError> {
        http::HeaderValue::from_str(&self.cors.allowed_origin)
            .map_err(|_| ConfigError::InvalidOrigin(self.cors.allowed_origin.clone()))
    }
}
