//! Target resolution from the inbound request line.
//!
//! # Responsibilities
//! - Extract the `url` query parameter (percent-decoded, first occurrence)
//! - Validate it as an absolute `http` or `https` URL with a host
//! - Resolve the port from the scheme when none is given
//!
//! # Design Decisions
//! - Purely syntactic: no DNS lookup or connection happens here
//! - Absence and malformance are distinct errors, never defaulted

use axum::http::Uri;
use url::{form_urlencoded, Url};

use crate::http::error::{ProxyError, ProxyResult};

/// Name of the query parameter carrying the destination.
pub const TARGET_PARAM: &str = "url";

/// Transport scheme of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Port used when the URL does not name one.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated destination URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    scheme: Scheme,
    host: String,
    port: u16,
    explicit_port: bool,
    path: String,
    query: Option<String>,
}

impl TargetUrl {
    /// Resolve the target named by the `url` query parameter of `uri`.
    pub fn from_request_uri(uri: &Uri) -> ProxyResult<Self> {
        let raw = uri
            .query()
            .and_then(|query| {
                form_urlencoded::parse(query.as_bytes())
                    .find(|(key, _)| key == TARGET_PARAM)
                    .map(|(_, value)| value.into_owned())
            })
            .ok_or(ProxyError::MissingTarget)?;

        Self::parse(&raw)
    }

    /// Parse and validate an absolute target URL.
    pub fn parse(raw: &str) -> ProxyResult<Self> {
        let url = Url::parse(raw).map_err(|e| ProxyError::InvalidTarget(e.to_string()))?;

        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(ProxyError::InvalidTarget(format!(
                    "unsupported scheme: {}",
                    other
                )))
            }
        };

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ProxyError::InvalidTarget("empty host".to_string()))?
            .to_string();

        Ok(Self {
            scheme,
            host,
            port: url.port().unwrap_or(scheme.default_port()),
            explicit_port: url.port().is_some(),
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host name or IP literal (IPv6 in brackets).
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolved port: explicit, or the scheme default.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Value for the outbound `Host` header.
    ///
    /// The port is included only when the URL named one; `url` drops ports
    /// equal to the scheme default while parsing.
    pub fn authority(&self) -> String {
        if self.explicit_port {
            format!("{}:{}", self.host, self.port)
        } else {
            self.host.clone()
        }
    }

    /// Path followed by the query exactly as captured, including an empty `?`.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

impl std::fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority(), self.path_and_query())
    }
}
