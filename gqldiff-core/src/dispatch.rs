//! Kind dispatch for diffing and merging.
//!
//! Every named type kind implements [`TypeComparator`] and [`TypeMerger`].
//! The functions here run the checks shared by all kinds and then route a
//! pair of definitions to the implementation for their kind with a `match`
//! on the [`NamedType`] tag.

use std::sync::Arc;

use tracing::trace;

use crate::config::Labels;
use crate::differ::changes::{dedupe, Diff};
use crate::differ::comparator::common_type_diffs;
use crate::error::Result;
use crate::merger::overwrite;
use crate::types::NamedType;

/// The two definitions under comparison, as stored in their schemas.
///
/// Diff records keep these handles so callers can inspect both sides.
#[derive(Clone, Copy, Debug)]
pub struct Subjects<'a> {
    pub this: &'a Arc<NamedType>,
    pub other: &'a Arc<NamedType>,
}

/// Kind-specific comparison, run once the shared preamble has established
/// that both sides exist with the same kind and name.
pub trait TypeComparator {
    fn compare(&self, other: &Self, subjects: Subjects<'_>, labels: &Labels) -> Vec<Diff>;
}

/// Result of merging one definition with another of the same name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Replace the definition with `other`'s wholesale, or keep `this` when
    /// there is no counterpart.
    Overwrite,
    /// A new definition combining both sides.
    Merged(NamedType),
}

/// Kind-specific merge of `other` into a copy of `self`.
pub trait TypeMerger {
    fn merge_with(&self, other: &NamedType) -> Result<MergeOutcome>;
}

/// Diff one definition against its counterpart, which may be absent.
pub fn diff_types(
    this: &Arc<NamedType>,
    other: Option<&Arc<NamedType>>,
    labels: &Labels,
) -> Vec<Diff> {
    trace!(type_name = this.name(), kind = %this.kind(), "diffing type");

    if let Some(diff) = common_type_diffs(this, other, labels) {
        return vec![diff];
    }
    let Some(other) = other else {
        return Vec::new();
    };
    let subjects = Subjects { this, other };

    let diffs = match (this.as_ref(), other.as_ref()) {
        (NamedType::Scalar(a), NamedType::Scalar(b)) => a.compare(b, subjects, labels),
        (NamedType::Enum(a), NamedType::Enum(b)) => a.compare(b, subjects, labels),
        (NamedType::Union(a), NamedType::Union(b)) => a.compare(b, subjects, labels),
        (NamedType::Object(a), NamedType::Object(b)) => a.compare(b, subjects, labels),
        (NamedType::Interface(a), NamedType::Interface(b)) => a.compare(b, subjects, labels),
        (NamedType::InputObject(a), NamedType::InputObject(b)) => {
            a.compare(b, subjects, labels)
        }
        // Mismatched kinds were reported by the preamble.
        _ => Vec::new(),
    };
    dedupe(diffs)
}

/// Merge one definition with its counterpart, which may be absent.
///
/// Untouched definitions are returned as shared handles; only a definition
/// that combines both sides is newly allocated.
pub fn merge_types(this: &Arc<NamedType>, other: Option<&Arc<NamedType>>) -> Result<Arc<NamedType>> {
    let outcome = match other {
        None => MergeOutcome::Overwrite,
        Some(other) => {
            trace!(type_name = this.name(), kind = %this.kind(), "merging type");
            match this.as_ref() {
                NamedType::Scalar(t) => t.merge_with(other)?,
                NamedType::Enum(t) => t.merge_with(other)?,
                NamedType::Union(t) => t.merge_with(other)?,
                NamedType::Object(t) => t.merge_with(other)?,
                NamedType::Interface(t) => t.merge_with(other)?,
                NamedType::InputObject(t) => t.merge_with(other)?,
            }
        }
    };

    Ok(match outcome {
        MergeOutcome::Overwrite => Arc::clone(overwrite(this, other)),
        MergeOutcome::Merged(merged) => Arc::new(merged),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiffOptions, Scope};
    use crate::differ::changes::DiffKind;
    use crate::types::{EnumType, ObjectType, ScalarType, UnionType};

    fn labels() -> Labels {
        Labels::resolve(&DiffOptions::default(), Scope::Type)
    }

    fn shared(t: impl Into<NamedType>) -> Arc<NamedType> {
        Arc::new(t.into())
    }

    #[test]
    fn test_diff_types_missing_counterpart() {
        let this = shared(ScalarType::new("Date"));
        let diffs = diff_types(&this, None, &labels());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::TypeMissing);
        assert!(!diffs[0].backward_compatible);
        assert_eq!(diffs[0].description, "Type missing from other type: `Date`.");
    }

    #[test]
    fn test_diff_types_kind_mismatch_short_circuits() {
        let this = shared(ScalarType::new("Pet").with_description("a"));
        let other = shared(UnionType::new("Pet", &["Cat"]).with_description("b"));
        let diffs = diff_types(&this, Some(&other), &labels());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::BaseTypeDiff);
        assert!(diffs[0].backward_compatible);
    }

    #[test]
    fn test_diff_types_routes_by_kind() {
        let this = shared(EnumType::new("Color").with_values(&["RED"]));
        let other = shared(EnumType::new("Color").with_values(&["RED", "BLUE"]));
        let diffs = diff_types(&this, Some(&other), &labels());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, DiffKind::EnumDiff);
    }

    #[test]
    fn test_merge_types_without_counterpart_shares() {
        let this = shared(ObjectType::new("Pet"));
        let merged = merge_types(&this, None).unwrap();
        assert!(Arc::ptr_eq(&this, &merged));
    }

    #[test]
    fn test_merge_types_overwrite_shares_other() {
        let this = shared(ScalarType::new("Date"));
        let other = shared(ScalarType::new("Date").with_description("ISO-8601"));
        let merged = merge_types(&this, Some(&other)).unwrap();
        assert!(Arc::ptr_eq(&other, &merged));
    }

    #[test]
    fn test_merge_types_enum_overwrite_shares_other() {
        let this = shared(EnumType::new("Color").with_values(&["RED", "GREEN"]));
        let other = shared(EnumType::new("Color").with_values(&["BLUE"]));
        let merged = merge_types(&this, Some(&other)).unwrap();
        assert!(Arc::ptr_eq(&other, &merged));

        let kept = merge_types(&other, None).unwrap();
        assert!(Arc::ptr_eq(&other, &kept));
    }

    #[test]
    fn test_merge_types_object_allocates() {
        let this = shared(ObjectType::new("Pet"));
        let other = shared(ObjectType::new("Pet"));
        let merged = merge_types(&this, Some(&other)).unwrap();
        assert!(!Arc::ptr_eq(&this, &merged));
        assert!(!Arc::ptr_eq(&other, &merged));
    }
}
