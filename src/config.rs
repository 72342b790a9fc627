//! API Configuration
//!
//! Where the todo API lives and how stale responses are treated.
//! Values come from compile-time env (`TODO_API_ORIGIN`,
//! `TODO_STALE_POLICY`), then the page origin, then defaults.

use thiserror::Error;
use url::Url;

use crate::sync::StalePolicy;

/// Collection endpoint path
pub const COLLECTION_PATH: &str = "/api/todos";
/// Health probe path
pub const HEALTH_PATH: &str = "/api/health";
/// Origin used when nothing else is available (local API server)
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid API origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },
    #[error("unknown stale policy {0:?} (expected \"apply-all\" or \"discard-superseded\")")]
    UnknownPolicy(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub origin: Url,
    pub stale_policy: StalePolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            stale_policy: StalePolicy::default(),
        }
    }
}

impl ApiConfig {
    /// Config for an explicit origin such as `https://todos.example.com`
    pub fn new(origin: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            origin: parse_origin(origin)?,
            stale_policy: StalePolicy::default(),
        })
    }

    pub fn with_stale_policy(mut self, stale_policy: StalePolicy) -> Self {
        self.stale_policy = stale_policy;
        self
    }

    /// Resolve from build-time env and the hosting page, logging any
    /// value that had to fall back to its default
    pub fn from_env() -> Self {
        let origin = option_env!("TODO_API_ORIGIN")
            .map(str::to_string)
            .or_else(page_origin);
        let (config, errors) = Self::resolve(origin.as_deref(), option_env!("TODO_STALE_POLICY"));
        for err in errors {
            log::warn!("{}; using default", err);
        }
        config
    }

    /// Build from optional raw values. Origin and policy fall back to
    /// their defaults independently.
    pub fn resolve(origin: Option<&str>, stale_policy: Option<&str>) -> (Self, Vec<ConfigError>) {
        let mut config = Self::default();
        let mut errors = Vec::new();
        if let Some(origin) = origin {
            match parse_origin(origin) {
                Ok(url) => config.origin = url,
                Err(err) => errors.push(err),
            }
        }
        if let Some(name) = stale_policy {
            match name.parse() {
                Ok(policy) => config.stale_policy = policy,
                Err(err) => errors.push(err),
            }
        }
        (config, errors)
    }

    pub fn collection_url(&self) -> Url {
        self.endpoint(COLLECTION_PATH)
    }

    pub fn health_url(&self) -> Url {
        self.endpoint(HEALTH_PATH)
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.origin.clone();
        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

fn parse_origin(origin: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidOrigin {
        origin: origin.to_string(),
        reason,
    };
    let url = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()));
    }
    Ok(url)
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window().and_then(|window| window.location().origin().ok())
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
    None
}
