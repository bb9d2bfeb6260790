//! # Schema Module
//!
//! Scans a Rust source file for service declarations and parameter records
//! and builds the in-memory [`Schema`] the planner consumes.
//!
//! ## Source Conventions
//!
//! ```rust,ignore
//! use apigen::runtime::RequestContext;
//! use apigen_macros::{apigen, ApiParams};
//!
//! pub struct MyApi;
//!
//! impl MyApi {
//!     #[apigen(url = "/user/create", auth = true, method = "POST")]
//!     pub fn create(&self, ctx: &RequestContext, params: CreateParams) -> Result<NewUser, ApiError> {
//!         // ...
//!     }
//! }
//!
//! #[derive(ApiParams)]
//! pub struct CreateParams {
//!     #[apivalidator("required,min=10")]
//!     pub login: String,
//!     #[apivalidator("paramname=full_name")]
//!     pub name: String,
//!     #[apivalidator("enum=user|moderator|admin,default=user")]
//!     pub status: String,
//!     #[apivalidator("min=0,max=128")]
//!     pub age: i32,
//! }
//! ```
//!
//! - A **service** is the self type of an inherent `impl` block.
//! - An **endpoint** is a method with a `self` receiver and a directive.
//! - The endpoint's **record** is named by its second typed argument.
//! - A **record** is any struct whose name contains `Params`.
//!
//! Methods without a directive and structs outside the naming convention are
//! skipped without error.

mod directive;
mod extract;
mod types;

#[cfg(test)]
mod tests;

pub use directive::{first_balanced_block, DirectiveSource};
pub use extract::{extract_from_file, extract_schema, ExtractOptions};
pub use types::{
    Directive, Endpoint, FieldKind, ParameterField, ParameterRecord, Schema, ServiceDeclaration,
};
