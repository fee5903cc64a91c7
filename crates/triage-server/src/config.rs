use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use axum::http::HeaderValue;
use toml_edit::{DocumentMut, Item};
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Single origin allowed by CORS, e.g. the front-end dev server
    pub allowed_origin: HeaderValue,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            allowed_origin: HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
        }
    }
}

impl ServerConfig {
    /// Resolve configuration: defaults, then the optional file, then explicit overrides
    /// (CLI flags or their environment variables).
    pub fn load(
        path: Option<&Path>,
        bind: Option<SocketAddr>,
        allowed_origin: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(bind) = bind {
            config.bind = bind;
        }
        if let Some(origin) = allowed_origin {
            config.allowed_origin = parse_origin(origin)?;
        }
        debug!(bind = %config.bind, origin = ?config.allowed_origin, "configuration resolved");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Read `bind` and `allowed_origin` from a TOML document. Other keys are ignored.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let doc: DocumentMut = text.parse()?;
        let mut config = Self::default();

        if let Some(value) = string_key(&doc, "bind")? {
            config.bind = value.parse().map_err(|source| ConfigError::InvalidBind {
                value: value.to_string(),
                source,
            })?;
        }
        if let Some(value) = string_key(&doc, "allowed_origin")? {
            config.allowed_origin = parse_origin(value)?;
        }

        Ok(config)
    }
}

fn string_key<'a>(doc: &'a DocumentMut, key: &str) -> Result<Option<&'a str>, ConfigError> {
    match doc.get(key) {
        None | Some(Item::None) => Ok(None),
        Some(item) => item.as_str().map(Some).ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            expected: "string",
        }),
    }
}

fn parse_origin(value: &str) -> Result<HeaderValue, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidOrigin(value.to_string()));
    }
    HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidOrigin(value.to_string()))
}
