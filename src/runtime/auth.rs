use http::header::HeaderName;
use http::HeaderMap;
use std::fmt;
use tracing::debug;

/// Environment variable [`SharedSecret::from_env`] reads the secret from.
pub const AUTH_SECRET_ENV: &str = "APIGEN_AUTH_SECRET";

/// Header checked by [`SharedSecret`] unless overridden.
pub const DEFAULT_AUTH_HEADER: &str = "x-auth";

/// Decides whether a request's credentials are acceptable.
///
/// Generated handlers call this only for endpoints whose directive sets
/// `auth`. Implementations are shared across requests and must be
/// thread-safe.
pub trait CredentialValidator: Send + Sync {
    /// Return `true` when the request may proceed.
    fn validate(&self, headers: &HeaderMap) -> bool;
}

impl<F> CredentialValidator for F
where
    F: Fn(&HeaderMap) -> bool + Send + Sync,
{
    fn validate(&self, headers: &HeaderMap) -> bool {
        self(headers)
    }
}

/// Accepts a request carrying exactly one auth header equal to the secret.
#[derive(Clone)]
pub struct SharedSecret {
    header: HeaderName,
    secret: String,
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            header: HeaderName::from_static(DEFAULT_AUTH_HEADER),
            secret: secret.into(),
        }
    }

    /// Check a different header instead of `X-Auth`.
    pub fn with_header(mut self, header: HeaderName) -> Self {
        self.header = header;
        self
    }

    /// Read the secret from `APIGEN_AUTH_SECRET`.
    ///
    /// Returns `None` when the variable is unset or empty.
    pub fn from_env() -> Option<Self> {
        std::env::var(AUTH_SECRET_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(Self::new)
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret")
            .field("header", &self.header)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl CredentialValidator for SharedSecret {
    fn validate(&self, headers: &HeaderMap) -> bool {
        let mut values = headers.get_all(&self.header).iter();
        match (values.next(), values.next()) {
            (Some(value), None) => value.as_bytes() == self.secret.as_bytes(),
            (None, _) => {
                debug!(header = %self.header, "auth header missing");
                false
            }
            (Some(_), Some(_)) => {
                debug!(header = %self.header, "auth header repeated");
                false
            }
        }
    }
}
