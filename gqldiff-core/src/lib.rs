//! gqldiff core - Compatibility-aware diffing and merging of schema graphs.
//!
//! This crate compares two resolved GraphQL-like schemas and reports every
//! difference between them, classifying each one as backward-compatible or
//! breaking. It can also merge two schemas into one, with the second schema's
//! definitions taking precedence.
//!
//! # Features
//!
//! - **Kind-aware diffing**: Scalars, enums, unions, objects, interfaces and
//!   input objects, down to fields, arguments and enum values
//! - **Breaking change detection**: Every diff carries a compatibility flag
//! - **Explainable output**: Descriptions name both sides with configurable labels
//! - **Deterministic merge**: Override and union semantics per kind, sharing
//!   every untouched definition with the inputs
//!
//! # Usage
//!
//! ```
//! use gqldiff_core::{diff_schema, merge_schema, DiffOptions, Schema, UnionType};
//!
//! let a = Schema::from_types([UnionType::new("Pet", &["Cat", "Dog"])]);
//! let b = Schema::from_types([UnionType::new("Pet", &["Dog", "Fish"])]);
//!
//! let diffs = diff_schema(&a, Some(&b), &DiffOptions::default()).unwrap();
//! assert_eq!(diffs.len(), 1);
//!
//! let merged = merge_schema(&a, Some(&b)).unwrap();
//! assert!(merged.contains("Pet"));
//! ```

pub mod config;
pub mod differ;
pub mod dispatch;
pub mod error;
pub mod merger;
pub mod signature;
pub mod types;

pub use config::{DiffOptions, Labels, Scope};
pub use differ::{
    diff_report, diff_schema, diff_type, ChangeType, Diff, DiffKind, DiffReport, DiffSummary,
    ElementType,
};
pub use error::{Result, SchemaError};
pub use merger::{merge_schema, overwrite};
pub use types::{
    Argument, EnumType, EnumValue, Field, InputObjectType, InterfaceType, NamedType, ObjectLike,
    ObjectType, ScalarType, Schema, TypeKind, TypeRef, UnionType,
};

/// Get the version of gqldiff-core.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
