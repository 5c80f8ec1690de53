//! Diff records and result structures for schema diffs.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::types::{Field, NamedType};

/// Specific kind of difference between two schema elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiffKind {
    TypeMissing,
    TypeNameDiff,
    BaseTypeDiff,
    TypeDescriptionDiff,
    FieldMissing,
    FieldDiff,
    FieldDescriptionDiff,
    ArgDiff,
    ArgDescriptionDiff,
    EnumDiff,
    UnionTypeDiff,
    InterfaceDiff,
}

impl DiffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::TypeMissing => "TypeMissing",
            DiffKind::TypeNameDiff => "TypeNameDiff",
            DiffKind::BaseTypeDiff => "BaseTypeDiff",
            DiffKind::TypeDescriptionDiff => "TypeDescriptionDiff",
            DiffKind::FieldMissing => "FieldMissing",
            DiffKind::FieldDiff => "FieldDiff",
            DiffKind::FieldDescriptionDiff => "FieldDescriptionDiff",
            DiffKind::ArgDiff => "ArgDiff",
            DiffKind::ArgDescriptionDiff => "ArgDescriptionDiff",
            DiffKind::EnumDiff => "EnumDiff",
            DiffKind::UnionTypeDiff => "UnionTypeDiff",
            DiffKind::InterfaceDiff => "InterfaceDiff",
        }
    }

    /// Schema element this kind of diff is about.
    pub fn element(&self) -> ElementType {
        match self {
            DiffKind::FieldMissing | DiffKind::FieldDiff | DiffKind::FieldDescriptionDiff => {
                ElementType::Field
            }
            DiffKind::ArgDiff | DiffKind::ArgDescriptionDiff => ElementType::Argument,
            DiffKind::EnumDiff => ElementType::EnumValue,
            _ => ElementType::Type,
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a change, read from `this` towards `other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    /// Present only in `other`.
    Added,
    /// Present only in `this`.
    Removed,
    Modified,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
            ChangeType::Modified => "modified",
        }
    }
}

/// Kind of schema element a diff is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    Type,
    Field,
    Argument,
    EnumValue,
}

/// A single reported difference between two schema elements.
///
/// Equality (and hashing) only looks at `kind` and `description`; that pair is
/// what duplicate detection keys on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diff {
    /// The type `diff` was called on (absent when `other` gained a type).
    pub subject_a: Option<Arc<NamedType>>,

    /// The type compared against (absent when it is missing from `other`).
    pub subject_b: Option<Arc<NamedType>>,

    pub kind: DiffKind,

    pub change_type: ChangeType,

    /// Human-readable explanation with the configured labels substituted in.
    pub description: String,

    /// Whether clients built against `this` keep working against `other`.
    pub backward_compatible: bool,

    /// Field on `subject_a` an argument description diff was found on.
    pub field_a: Option<Field>,

    /// Field on `subject_b` an argument description diff was found on.
    pub field_b: Option<Field>,
}

impl Diff {
    pub fn new(
        subject_a: Option<&Arc<NamedType>>,
        subject_b: Option<&Arc<NamedType>>,
        kind: DiffKind,
        change_type: ChangeType,
        description: String,
        backward_compatible: bool,
    ) -> Self {
        Self {
            subject_a: subject_a.cloned(),
            subject_b: subject_b.cloned(),
            kind,
            change_type,
            description,
            backward_compatible,
            field_a: None,
            field_b: None,
        }
    }

    /// Attach the pair of fields the diff was found on.
    pub fn with_fields(mut self, field_a: &Field, field_b: &Field) -> Self {
        self.field_a = Some(field_a.clone());
        self.field_b = Some(field_b.clone());
        self
    }

    pub fn is_breaking(&self) -> bool {
        !self.backward_compatible
    }

    /// Name of the type this diff is about, from whichever side is present.
    pub fn type_name(&self) -> Option<&str> {
        self.subject_a
            .as_deref()
            .or(self.subject_b.as_deref())
            .map(|t| t.name())
    }
}

impl PartialEq for Diff {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.description == other.description
    }
}

impl Eq for Diff {}

impl Hash for Diff {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.description.hash(state);
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[diffType={}, description=\"{}\"]",
            self.kind, self.description
        )
    }
}

/// Drop repeated diffs, keeping the first occurrence of each
/// `(kind, description)` pair.
pub fn dedupe(diffs: Vec<Diff>) -> Vec<Diff> {
    let mut seen = HashSet::with_capacity(diffs.len());
    diffs
        .into_iter()
        .filter(|d| seen.insert((d.kind, d.description.clone())))
        .collect()
}

/// Summary statistics for a diff.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub types_added: u32,
    pub types_removed: u32,
    pub types_modified: u32,

    pub fields_added: u32,
    pub fields_removed: u32,
    pub fields_modified: u32,

    pub arguments_added: u32,
    pub arguments_removed: u32,
    pub arguments_modified: u32,

    pub enum_values_added: u32,
    pub enum_values_removed: u32,
    pub enum_values_modified: u32,

    pub breaking_changes: u32,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment counters for one diff.
    pub fn record(&mut self, diff: &Diff) {
        let (added, removed, modified) = match diff.kind.element() {
            ElementType::Type => (
                &mut self.types_added,
                &mut self.types_removed,
                &mut self.types_modified,
            ),
            ElementType::Field => (
                &mut self.fields_added,
                &mut self.fields_removed,
                &mut self.fields_modified,
            ),
            ElementType::Argument => (
                &mut self.arguments_added,
                &mut self.arguments_removed,
                &mut self.arguments_modified,
            ),
            ElementType::EnumValue => (
                &mut self.enum_values_added,
                &mut self.enum_values_removed,
                &mut self.enum_values_modified,
            ),
        };
        match diff.change_type {
            ChangeType::Added => *added += 1,
            ChangeType::Removed => *removed += 1,
            ChangeType::Modified => *modified += 1,
        }

        if diff.is_breaking() {
            self.breaking_changes += 1;
        }
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let groups = [
            ("types", self.types_added, self.types_removed, self.types_modified),
            ("fields", self.fields_added, self.fields_removed, self.fields_modified),
            (
                "arguments",
                self.arguments_added,
                self.arguments_removed,
                self.arguments_modified,
            ),
            (
                "enum values",
                self.enum_values_added,
                self.enum_values_removed,
                self.enum_values_modified,
            ),
        ];

        let mut parts = Vec::new();
        for (label, added, removed, modified) in groups {
            let mut group_parts = Vec::new();
            if added > 0 {
                group_parts.push(format!("{} added", added));
            }
            if removed > 0 {
                group_parts.push(format!("{} removed", removed));
            }
            if modified > 0 {
                group_parts.push(format!("{} modified", modified));
            }
            if !group_parts.is_empty() {
                parts.push(format!("{}: {}", label, group_parts.join(", ")));
            }
        }

        if parts.is_empty() {
            return "No changes".to_string();
        }
        if self.breaking_changes > 0 {
            parts.push(format!("{} breaking", self.breaking_changes));
        }
        parts.join("; ")
    }
}

/// Complete result of a schema diff.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiffReport {
    /// All diffs, in discovery order
    pub diffs: Vec<Diff>,

    /// Breaking diffs only
    pub breaking_diffs: Vec<Diff>,

    pub summary: DiffSummary,

    pub summary_text: String,

    /// Duration of the diff in milliseconds
    pub duration_ms: f64,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diff and update summary.
    pub fn add_diff(&mut self, diff: Diff) {
        self.summary.record(&diff);

        if diff.is_breaking() {
            self.breaking_diffs.push(diff.clone());
        }

        self.diffs.push(diff);
    }

    /// Finalize the report with timing and summary text.
    pub fn finalize(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms;
        self.summary_text = self.summary.text();
    }

    pub fn is_changed(&self) -> bool {
        !self.diffs.is_empty()
    }

    pub fn is_breaking(&self) -> bool {
        !self.breaking_diffs.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.diffs.len()
    }

    /// Filter diffs by kind.
    pub fn filter_kind(&self, kind: DiffKind) -> Vec<&Diff> {
        self.diffs.iter().filter(|d| d.kind == kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diff(kind: DiffKind, change_type: ChangeType, description: &str, compatible: bool) -> Diff {
        Diff::new(None, None, kind, change_type, description.to_string(), compatible)
    }

    #[test]
    fn test_diff_kind_as_str() {
        assert_eq!(DiffKind::TypeMissing.as_str(), "TypeMissing");
        assert_eq!(DiffKind::ArgDescriptionDiff.to_string(), "ArgDescriptionDiff");
        assert_eq!(DiffKind::FieldDiff.element(), ElementType::Field);
        assert_eq!(DiffKind::UnionTypeDiff.element(), ElementType::Type);
    }

    #[test]
    fn test_diff_display() {
        let diff = make_diff(DiffKind::EnumDiff, ChangeType::Added, "Enum value missing", true);
        assert_eq!(
            diff.to_string(),
            "[diffType=EnumDiff, description=\"Enum value missing\"]"
        );
    }

    #[test]
    fn test_diff_equality_ignores_compatibility() {
        let a = make_diff(DiffKind::FieldDiff, ChangeType::Modified, "same", true);
        let b = make_diff(DiffKind::FieldDiff, ChangeType::Modified, "same", false);
        let c = make_diff(DiffKind::ArgDiff, ChangeType::Modified, "same", true);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_diff_type_name_prefers_subject_a() {
        let a: Arc<NamedType> = Arc::new(crate::types::ScalarType::new("Date").into());
        let diff = Diff::new(
            None,
            Some(&a),
            DiffKind::TypeMissing,
            ChangeType::Added,
            String::new(),
            true,
        );
        assert_eq!(diff.type_name(), Some("Date"));
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let diffs = vec![
            make_diff(DiffKind::EnumDiff, ChangeType::Added, "x", true),
            make_diff(DiffKind::EnumDiff, ChangeType::Added, "x", false),
            make_diff(DiffKind::EnumDiff, ChangeType::Added, "y", true),
        ];
        let deduped = dedupe(diffs);
        assert_eq!(deduped.len(), 2);
        assert!(deduped[0].backward_compatible);
    }

    #[test]
    fn test_diff_summary_record() {
        let mut summary = DiffSummary::default();

        summary.record(&make_diff(DiffKind::FieldMissing, ChangeType::Added, "", true));
        assert_eq!(summary.fields_added, 1);

        summary.record(&make_diff(DiffKind::TypeMissing, ChangeType::Removed, "", false));
        assert_eq!(summary.types_removed, 1);
        assert_eq!(summary.breaking_changes, 1);

        summary.record(&make_diff(DiffKind::EnumDiff, ChangeType::Modified, "", true));
        assert_eq!(summary.enum_values_modified, 1);
    }

    #[test]
    fn test_diff_summary_text() {
        let summary = DiffSummary {
            fields_added: 2,
            types_removed: 1,
            breaking_changes: 1,
            ..Default::default()
        };

        let text = summary.text();
        assert!(text.contains("types: 1 removed"));
        assert!(text.contains("fields: 2 added"));
        assert!(text.ends_with("1 breaking"));
    }

    #[test]
    fn test_diff_summary_text_no_changes() {
        let summary = DiffSummary::default();
        assert_eq!(summary.text(), "No changes");
    }

    #[test]
    fn test_diff_report_add_diff() {
        let mut report = DiffReport::default();

        report.add_diff(make_diff(DiffKind::FieldMissing, ChangeType::Added, "a", true));
        assert!(report.is_changed());
        assert!(!report.is_breaking());

        report.add_diff(make_diff(DiffKind::FieldMissing, ChangeType::Removed, "b", false));
        assert!(report.is_breaking());
        assert_eq!(report.breaking_diffs.len(), 1);
        assert_eq!(report.change_count(), 2);
        assert_eq!(report.filter_kind(DiffKind::FieldMissing).len(), 2);
        assert!(report.filter_kind(DiffKind::ArgDiff).is_empty());
    }

    #[test]
    fn test_diff_report_finalize() {
        let mut report = DiffReport::default();
        report.summary.fields_added = 1;

        report.finalize(42.5);

        assert_eq!(report.duration_ms, 42.5);
        assert_eq!(report.summary_text, "fields: 1 added");
    }
}
