use crate::adapter::database_config::{parse_var, ConfigError};
use std::env;
use std::net::SocketAddr;

/// HTTPサーバーの待ち受け設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// SERVER_HOST / SERVER_PORT から読み取る
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("SERVER_PORT", 9090)?,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid SERVER_HOST: {}", e)))
    }
}
