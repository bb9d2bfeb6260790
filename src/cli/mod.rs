//! # CLI Module
//!
//! Command-line interface for the `apigen` binary.
//!
//! ## Commands
//!
//! ### generate (default)
//!
//! ```bash
//! apigen [--config apigen.yaml] [--strict] [--runtime-path crate::rt] [--dry-run] src/api.rs src/api_handlers.rs
//! ```
//!
//! - `--config <FILE>` - YAML configuration (also `APIGEN_CONFIG`)
//! - `--strict` - reject unknown constraint tokens
//! - `--runtime-path <PATH>` - module generated code calls into
//! - `--dry-run` - render and report without writing
//!
//! ### `inspect`
//!
//! Print the extracted schema as JSON:
//!
//! ```bash
//! apigen inspect src/api.rs
//! ```
//!
//! ### `lint`
//!
//! ```bash
//! apigen lint src/api.rs --fail-on-error
//! ```
//!
//! Any fatal error exits non-zero with the full error chain.

mod commands;


pub use commands::{
    inspect_json, resolve_config, run, run_cli, run_generate, Cli, Commands, GenerateArgs,
};
