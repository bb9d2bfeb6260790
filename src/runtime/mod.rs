//! # Runtime Module
//!
//! Support code that generated handlers call into. Everything a generated
//! file references lives under this path (configurable with `runtime_path`).
//!
//! ## Request Flow
//!
//! A generated `serve_http` maps the request path to an endpoint and calls
//! [`serve_endpoint`], which runs:
//!
//! 1. the verb check (`406 bad method`)
//! 2. the credential check through a [`CredentialValidator`] (`403 unauthorized`)
//! 3. field validation with [`validate_str`] / [`validate_int`] (`400`)
//! 4. the service method
//! 5. error classification with [`classify_domain_error`]
//!
//! and wraps the outcome in an [`Envelope`].
//!
//! ## Example
//!
//! ```rust
//! use apigen::runtime::{ApiRequest, Method, SharedSecret, CredentialValidator};
//! use http::header::{HeaderName, HeaderValue};
//!
//! let creds = SharedSecret::new("s3cret");
//! let req = ApiRequest::new(Method::GET, "/user/profile?login=alice")
//!     .with_header(HeaderName::from_static("x-auth"), HeaderValue::from_static("s3cret"));
//! assert!(creds.validate(req.headers()));
//! assert_eq!(req.param_values()["login"], "alice");
//! ```

mod auth;
mod ids;
mod request;
mod response;
mod serve;
mod validate;

#[cfg(test)]
mod tests;

pub use auth::{CredentialValidator, SharedSecret, AUTH_SECRET_ENV, DEFAULT_AUTH_HEADER};
pub use http::{Method, StatusCode};
pub use ids::{RequestId, REQUEST_ID_HEADER};
pub use request::{ApiRequest, RequestContext};
pub use response::{classify_domain_error, ApiResponse, Envelope};
pub use serve::{serve_endpoint, EndpointGuard};
pub use validate::{validate_int, validate_str, ParamRejection, ParamValues};

/// Re-exported so generated code can build constraint literals through the
/// runtime path alone.
pub use crate::constraint::{ConstraintSet, EnumConstraint};
