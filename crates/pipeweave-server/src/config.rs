//! HTTP server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result as AnyhowResult, bail};
use axum::http::{HeaderValue, Method, header};
use clap::Args;
use tower_http::cors::CorsLayer;

/// Origin the canvas dev server runs on; used when no origins are configured.
const DEFAULT_CANVAS_ORIGIN: &str = "http://localhost:3000";

/// HTTP server configuration.
///
/// # Environment Variables
///
/// All configuration options can be set via environment variables:
/// - `HOST` - Server host address (default: 127.0.0.1)
/// - `PORT` - Server port (default: 8000, valid range: 1024-65535)
/// - `CORS_ALLOWED_ORIGINS` - Comma-separated list of allowed CORS origins
#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Host address to bind the server to.
    ///
    /// Use "127.0.0.1" for localhost only, "0.0.0.0" for all interfaces.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// TCP port number for the server to listen on.
    ///
    /// Must be in the range 1024-65535. Ports below 1024 require root
    /// privileges.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// List of allowed CORS origins.
    ///
    /// If empty, the local canvas origin is used for development.
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Validates all configuration values.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.port < 1024 {
            bail!("port {} is reserved; use a port in 1024-65535", self.port);
        }
        Ok(())
    }

    /// Returns the socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Builds the CORS layer for the canvas origin(s).
    ///
    /// The canvas posts JSON from another origin, so the browser preflights
    /// the validation request. Methods and headers stay explicit because
    /// credentials are allowed.
    pub fn cors_layer(&self) -> AnyhowResult<CorsLayer> {
        let configured = if self.cors_allowed_origins.is_empty() {
            vec![DEFAULT_CANVAS_ORIGIN.to_string()]
        } else {
            self.cors_allowed_origins.clone()
        };

        let mut origins = Vec::with_capacity(configured.len());
        for origin in &configured {
            let value = origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin: {origin}"))?;
            origins.push(value);
        }

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().port(), 8000);
    }

    #[test]
    fn test_reserved_port_is_rejected() {
        let config = ServerConfig {
            port: 80,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_layer_accepts_configured_origins() {
        let config = ServerConfig {
            cors_allowed_origins: vec!["https://canvas.example.com".to_string()],
            ..Default::default()
        };
        assert!(config.cors_layer().is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let config = ServerConfig {
            cors_allowed_origins: vec!["not an origin\u{7f}".to_string()],
            ..Default::default()
        };
        assert!(config.cors_layer().is_err());
    }
}
