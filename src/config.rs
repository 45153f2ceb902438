//! Server configuration from environment variables

use std::net::SocketAddr;

use crate::state::DEFAULT_PUBLIC_URL;

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// Directory served for paths that are not API routes
    pub static_dir: String,
    /// Origin used to build absolute quiz links for QR codes
    pub public_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

/// Read a variable, treating blank values as unset
fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `QUIZHUNT_BIND`: listen address (default `0.0.0.0:3000`)
    /// - `QUIZHUNT_STATIC_DIR`: static file directory (default `static`)
    /// - `QUIZHUNT_PUBLIC_URL`: public origin for quiz links (default `http://localhost:3000`)
    pub fn from_env() -> Self {
        let bind_addr = match env_non_empty("QUIZHUNT_BIND") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    "Invalid QUIZHUNT_BIND {:?} ({}), falling back to {}",
                    raw,
                    e,
                    DEFAULT_BIND
                );
                default_bind_addr()
            }),
            None => default_bind_addr(),
        };

        let static_dir =
            env_non_empty("QUIZHUNT_STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());

        let public_url = env_non_empty("QUIZHUNT_PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string());

        tracing::info!(
            %bind_addr,
            %static_dir,
            %public_url,
            "Configuration loaded"
        );

        Self {
            bind_addr,
            static_dir,
            public_url,
        }
    }
}
