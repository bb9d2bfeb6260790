//! Example service built on generated apigen handlers.
//!
//! ```rust
//! use apigen::runtime::{ApiRequest, Method, SharedSecret};
//! use user_service::UserApi;
//!
//! let api = UserApi::new();
//! let creds = SharedSecret::new("s3cret");
//! let resp = api.serve_http(&ApiRequest::new(Method::GET, "/user/count"), &creds);
//! assert_eq!(resp.status, 200);
//! ```

pub mod api;

pub use api::{ApiError, User, UserApi, UserApiEndpoint};
