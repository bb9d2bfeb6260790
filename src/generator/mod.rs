//! # Generator Module
//!
//! Turns an extracted [`Schema`](crate::schema::Schema) into Rust handler code.
//!
//! ## Architecture
//!
//! ```text
//! source.rs → schema::extract_schema → plan_schema → emit_file → write_atomic
//! ```
//!
//! 1. **Plan** - per service, a route-keyed dispatch table and an ordered list
//!    of [`PlanStep`]s per endpoint (verb check, auth check, one validation
//!    per field, invocation, error classification, envelope)
//! 2. **Emit** - plans become token streams via `quote`, are parsed into a
//!    `syn::File` and formatted with `prettyplease`
//! 3. **Write** - the rendered file replaces the output path atomically
//!
//! ## Generated Code
//!
//! For a service `MyApi` with endpoints `profile` and `create` the output
//! contains:
//!
//! ```rust,ignore
//! pub enum MyApiEndpoint { Profile, Create }
//!
//! impl MyApiEndpoint {
//!     pub fn from_route(route: &str) -> Option<Self>;
//!     pub fn route(&self) -> &'static str;
//! }
//!
//! impl MyApi {
//!     pub fn serve_http(&self, req: &ApiRequest, creds: &dyn CredentialValidator) -> ApiResponse;
//!     fn profile_http_handler(&self, req: &ApiRequest, creds: &dyn CredentialValidator) -> ApiResponse;
//!     fn create_http_handler(&self, req: &ApiRequest, creds: &dyn CredentialValidator) -> ApiResponse;
//! }
//! ```
//!
//! Each service method must return `Result<T, E>` with `T: Serialize` and
//! `E: Display`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use apigen::generator::{generate_file, GenerateOptions};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let report = generate_file(
//!     Path::new("src/api.rs"),
//!     Path::new("src/api_handlers.rs"),
//!     &GenerateOptions::default(),
//! )?;
//! println!("{} endpoints", report.endpoints);
//! # Ok(())
//! # }
//! ```

mod emit;
mod generate;
mod plan;

pub use emit::{emit_file, EmitOptions, DEFAULT_RUNTIME_PATH};
pub use generate::{
    generate_file, render_source, write_atomic, GenerateOptions, GenerateReport, Rendered,
};
pub use plan::{plan_schema, to_camel_case, EndpointPlan, PlanStep, ServicePlan};
