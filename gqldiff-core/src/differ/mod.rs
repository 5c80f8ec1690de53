//! Schema diff engine with backward-compatibility classification.
//!
//! Compares two schemas (or two named types) and reports every difference as
//! a [`Diff`] record carrying a kind, a human-readable description and a flag
//! saying whether clients written against `this` keep working against `other`.
//!
//! # Features
//!
//! - **Type-level diffing**: Missing types, kind and name changes, descriptions
//! - **Member diffing**: Fields, arguments, enum values, union members, interfaces
//! - **Breaking change detection**: Every diff is classified as compatible or not
//! - **Summary generation**: [`DiffReport`] with counts and a one-line summary
//!
//! # Example
//!
//! ```
//! use gqldiff_core::{diff_schema, DiffOptions, Field, ObjectType, Schema, TypeRef};
//!
//! let before = Schema::from_types([ObjectType::new("Pet")
//!     .with_field(Field::new("name", TypeRef::named("String")))]);
//! let after = Schema::from_types([ObjectType::new("Pet")
//!     .with_field(Field::new("name", TypeRef::named("String").non_null()))]);
//!
//! let diffs = diff_schema(&before, Some(&after), &DiffOptions::default()).unwrap();
//! assert_eq!(diffs.len(), 1);
//! assert!(!diffs[0].backward_compatible);
//! ```

pub mod changes;
pub mod comparator;

// Re-export types for lib.rs
pub use changes::{dedupe, ChangeType, Diff, DiffKind, DiffReport, DiffSummary, ElementType};
pub use comparator::{diff_report, diff_schema, diff_type};
