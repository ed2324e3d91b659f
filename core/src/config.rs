//! Connection settings and request construction.
//!
//! `Configuration` owns everything needed to turn an operation into an
//! `HttpRequest`: scheme, host, base path and the bearer token. It performs
//! no I/O, so requests can be built and inspected without a transport.

use std::fmt;

use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};

pub const DEFAULT_HOST: &str = "api.youneedabudget.com";
pub const DEFAULT_BASE_PATH: &str = "/v1";

pub const ENV_ACCESS_TOKEN: &str = "YNAB_ACCESS_TOKEN";
pub const ENV_HOST: &str = "YNAB_API_HOST";
pub const ENV_USE_TLS: &str = "YNAB_API_USE_TLS";

#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    access_token: String,
    host: String,
    use_tls: bool,
    base_path: String,
    user_agent: String,
}

impl Configuration {
    pub fn new(access_token: impl Into<String>, host: impl Into<String>, use_tls: bool) -> Self {
        Self {
            access_token: access_token.into(),
            host: host.into(),
            use_tls,
            base_path: DEFAULT_BASE_PATH.to_string(),
            user_agent: format!("ynab-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Reads `YNAB_ACCESS_TOKEN` (required), `YNAB_API_HOST` and
    /// `YNAB_API_USE_TLS` from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let access_token = lookup(ENV_ACCESS_TOKEN)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Configuration(format!("{ENV_ACCESS_TOKEN} is not set")))?;
        let host = lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let use_tls = match lookup(ENV_USE_TLS).as_deref() {
            None => true,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => {
                return Err(ApiError::Configuration(format!(
                    "{ENV_USE_TLS} must be true or false, got {other:?}"
                )))
            }
        };
        Ok(Self::new(access_token, host, use_tls))
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn use_tls(&self) -> bool {
        self.use_tls
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}{}", self.host, self.base_path)
    }

    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Absolute URL for `segments` under the base path. Each segment is
    /// percent-escaped, and the dot segments `.` and `..` are rejected since
    /// URL normalization would resolve them away.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<String, ApiError> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ApiError::InvalidArgument(format!(
                "path segment {dot:?} is not allowed"
            )));
        }
        let base = self.base_url();
        let mut url = Url::parse(&base)
            .map_err(|e| ApiError::Configuration(format!("invalid base url {base:?}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration(format!("base url {base:?} cannot take a path")))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.into())
    }

    /// Builds an authorized request. `Content-Type` is added only when a
    /// body is present.
    pub fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = vec![
            ("Authorization".to_string(), self.authorization()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.user_agent.clone()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        Ok(HttpRequest {
            method,
            url: self.endpoint(segments, query)?,
            headers,
            body,
        })
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("access_token", &"<redacted>")
            .field("host", &self.host)
            .field("use_tls", &self.use_tls)
            .field("base_path", &self.base_path)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
