//! # apigen
//!
//! **apigen** reads a Rust source file declaring services and parameter
//! records, and generates the HTTP handler layer for them: route dispatch,
//! verb and credential checks, per-field validation, invocation and a JSON
//! envelope.
//!
//! ## Architecture
//!
//! - **[`constraint`]** - constraint expression grammar (`required,min=10`)
//! - **[`schema`]** - scans source with `syn` for services, endpoints and records
//! - **[`generator`]** - plans per-endpoint steps and emits Rust with `quote`
//! - **[`runtime`]** - request/response types and validation the emitted code calls
//! - **[`linter`]** - warnings for declarations that are probably mistakes
//! - **[`config`]** - layered YAML / environment configuration
//! - **[`cli`]** - the `apigen` command line
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(apigen)
//!     participant Config as config::GeneratorConfig
//!     participant Schema as schema::extract_schema
//!     participant Plan as generator::plan_schema
//!     participant Emit as generator::emit_file
//!     participant FS as File System
//!
//!     User->>CLI: apigen src/api.rs src/api_handlers.rs
//!     CLI->>Config: load(--config) + APIGEN_* + flags
//!     CLI->>FS: read src/api.rs
//!     CLI->>Schema: extract_schema(source)
//!     Schema->>Schema: syn::parse_file
//!     Schema->>Schema: directives, records, constraints
//!     Schema-->>CLI: Schema
//!     CLI->>Plan: plan_schema(&schema)
//!     Plan->>Plan: route table, duplicate check
//!     Plan->>Plan: verb → auth → validate* → invoke
//!     Plan-->>CLI: Vec<ServicePlan>
//!     CLI->>Emit: emit_file(&plans)
//!     Emit->>Emit: quote! → syn::File → prettyplease
//!     Emit-->>CLI: String
//!     CLI->>FS: temp file + rename
//!     CLI-->>User: ✅ Generated N endpoint(s)
//! ```
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as Host server
//!     participant Svc as MyApi::serve_http
//!     participant RT as runtime::serve_endpoint
//!     participant Method as MyApi::create
//!
//!     Host->>Svc: ApiRequest
//!     alt unknown route
//!         Svc-->>Host: 404 unknown method
//!     end
//!     Svc->>RT: guard, extract, invoke
//!     alt wrong verb
//!         RT-->>Host: 406 bad method
//!     end
//!     alt credentials rejected
//!         RT-->>Host: 403 unauthorized
//!     end
//!     RT->>RT: validate fields in order
//!     alt field rejected
//!         RT-->>Host: 400 + message
//!     end
//!     RT->>Method: (RequestContext, Params)
//!     Method-->>RT: Result<T, E>
//!     RT-->>Host: 200 / 404 / 409 / 500 + envelope
//! ```
//!
//! ## Declaring a Service
//!
//! ```rust,ignore
//! use apigen::runtime::RequestContext;
//! use apigen_macros::{apigen, ApiParams};
//!
//! pub struct MyApi;
//!
//! impl MyApi {
//!     #[apigen(url = "/user/create", auth, method = "POST")]
//!     pub fn create(&self, ctx: &RequestContext, params: CreateParams) -> Result<User, String> {
//!         // ...
//!     }
//! }
//!
//! #[derive(ApiParams)]
//! pub struct CreateParams {
//!     #[apivalidator("required,min=10")]
//!     pub login: String,
//!     #[apivalidator("enum=user|moderator|admin,default=user")]
//!     pub status: String,
//! }
//! ```
//!
//! ## Serving Generated Handlers
//!
//! ```rust,ignore
//! use apigen::runtime::{ApiRequest, Method, SharedSecret};
//!
//! let api = MyApi;
//! let creds = SharedSecret::from_env().unwrap_or_else(|| SharedSecret::new("dev-secret"));
//! let req = ApiRequest::new(Method::POST, "/user/create").with_body("login=averylonglogin");
//! let resp = api.serve_http(&req, &creds);
//! ```

pub mod cli;
pub mod config;
pub mod constraint;
pub mod error;
pub mod generator;
pub mod linter;
pub mod logging;
pub mod runtime;
pub mod schema;

pub use config::{ConfigError, GeneratorConfig};
pub use error::GenError;
pub use generator::{generate_file, render_source, GenerateOptions};
pub use schema::{extract_schema, Schema};
