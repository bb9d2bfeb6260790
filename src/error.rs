//! Generator error types.
//!
//! Every variant here is fatal for a generator run: the pipeline stops and no
//! output file is written. Request-time validation failures live in
//! [`crate::runtime::ParamRejection`] instead.

use crate::constraint::ConstraintError;
use thiserror::Error;

/// A fatal error raised while extracting or planning a schema.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("{line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("invalid directive on `{service}::{method}`: {reason}")]
    InvalidDirective {
        service: String,
        method: String,
        reason: String,
    },

    #[error("`{service}::{method}` has a directive but {reason}")]
    InvalidRecordArgument {
        service: String,
        method: String,
        reason: String,
    },

    #[error("field `{record}.{field}` has unsupported type `{ty}` (expected String or an integer type)")]
    UnsupportedFieldType {
        record: String,
        field: String,
        ty: String,
    },

    #[error("record `{record}` must use named fields")]
    UnsupportedRecordShape { record: String },

    #[error("constraint on `{record}.{field}`: {source}")]
    Constraint {
        record: String,
        field: String,
        #[source]
        source: ConstraintError,
    },

    #[error("service `{service}` declares route `{route}` more than once")]
    DuplicateRoute { service: String, route: String },

    #[error("invalid HTTP verb `{verb}` on `{service}::{method}`")]
    InvalidVerb {
        service: String,
        method: String,
        verb: String,
    },

    #[error("runtime path `{path}` is not a valid Rust path: {message}")]
    InvalidRuntimePath { path: String, message: String },

    #[error("emitted code for `{service}` failed to parse: {message}")]
    Emit { service: String, message: String },
}

impl From<syn::Error> for GenError {
    fn from(err: syn::Error) -> Self {
        let start = err.span().start();
        GenError::Syntax {
            line: start.line,
            column: start.column + 1,
            message: err.to_string(),
        }
    }
}
