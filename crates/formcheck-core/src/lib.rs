//! Formcheck Core Library
//!
//! This crate provides a composable schema validation engine for JSON form
//! payloads:
//!
//! - **Schemas**: type checks, objects, optional and fallback wrappers
//! - **Validators**: length, format, email and numeric bound checks
//! - **Pipes**: a schema followed by validations and transformations
//! - **Cross-field checks**: predicates over several fields, forwarded to one
//! - **Messages**: per-node, per-language and fallback message resolution
//!
//! Validation never fails with a Rust error. Every problem is recorded as an
//! [`Issue`] with a path from the root of the input.
//!
//! # Example
//!
//! ```rust
//! use formcheck_core::schema::{email, min_length, non_empty, object, pipe, string};
//! use formcheck_core::{to_field_errors, validate, ConfigOverrides};
//! use serde_json::json;
//!
//! let schema = object([
//!     ("email", pipe([string(), non_empty(), email()])),
//!     ("password", pipe([string(), min_length(8)])),
//! ]);
//!
//! let input = json!({"email": "a@b.co", "password": "hunter22"});
//! let output = validate(&schema, input, ConfigOverrides::new());
//! assert!(output.success);
//!
//! let input = json!({"email": "nope", "password": "x"});
//! let errors = to_field_errors(&schema, input, ConfigOverrides::new());
//! assert_eq!(errors.len(), 2);
//! ```

mod config;
mod dataset;
mod error;
mod issue;
mod message;
pub mod schema;
mod validate;

pub use config::{global_config, install_global_config, Config, ConfigOverrides, GlobalConfig};
pub use dataset::Dataset;
pub use error::{ConfigError, SchemaError};
pub use issue::{describe_received, Issue, IssueOverrides, Kind, Origin, PathItem, PathType};
pub use message::{resolve_message, Locale, MessageChain, MessageSource};
pub use schema::{Node, Reference, Run};
pub use validate::{
    flatten_issues, to_field_errors, validate, validate_async, validate_with, FieldErrors, Output,
};
