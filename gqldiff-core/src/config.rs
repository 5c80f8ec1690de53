//! Diff configuration.
//!
//! The only knobs are the labels substituted into diff descriptions for the
//! two sides of a comparison. Both are optional; unset labels fall back to
//! defaults that depend on where the diff was started.
//!
//! # Example Configuration
//!
//! ```toml
//! label_for_this = "production"
//! label_for_other = "staging"
//! ```

use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_LABEL_THIS_SCHEMA: &str = "this schema";
pub const DEFAULT_LABEL_OTHER_SCHEMA: &str = "other schema";
pub const DEFAULT_LABEL_THIS_TYPE: &str = "this type";
pub const DEFAULT_LABEL_OTHER_TYPE: &str = "other type";

/// Options recognized by the diff entry points.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DiffOptions {
    /// Name used for the schema or type `diff` was called on.
    #[serde(default)]
    pub label_for_this: Option<String>,

    /// Name used for the schema or type being compared against.
    #[serde(default)]
    pub label_for_other: Option<String>,
}

impl DiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, this: &str, other: &str) -> Self {
        self.label_for_this = Some(this.to_string());
        self.label_for_other = Some(other.to_string());
        self
    }

    /// Parse options from a TOML snippet.
    ///
    /// Unknown keys are ignored; a malformed document is an invalid argument.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

/// Where a diff was started; decides which default labels apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Schema,
    Type,
}

/// Labels after defaults have been applied. Passed down explicitly through
/// every nested comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    pub this: String,
    pub other: String,
}

impl Labels {
    pub fn resolve(options: &DiffOptions, scope: Scope) -> Self {
        let (this, other) = match scope {
            Scope::Schema => (DEFAULT_LABEL_THIS_SCHEMA, DEFAULT_LABEL_OTHER_SCHEMA),
            Scope::Type => (DEFAULT_LABEL_THIS_TYPE, DEFAULT_LABEL_OTHER_TYPE),
        };
        Self {
            this: pick(options.label_for_this.as_deref(), this),
            other: pick(options.label_for_other.as_deref(), other),
        }
    }
}

// Empty labels count as unset.
fn pick(label: Option<&str>, default: &str) -> String {
    match label {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => default.to_string(),
    }
}
