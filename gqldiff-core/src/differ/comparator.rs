//! Comparator logic for diffing schemas.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::config::{DiffOptions, Labels, Scope};
use crate::differ::changes::{dedupe, ChangeType, Diff, DiffKind, DiffReport};
use crate::dispatch::{diff_types, Subjects, TypeComparator};
use crate::error::{Result, SchemaError};
use crate::signature::{field_signature, type_signature};
use crate::types::{
    Argument, EnumType, EnumValue, Field, InputObjectType, InterfaceType, NamedType, ObjectLike,
    ObjectType, ScalarType, Schema, UnionType,
};

fn text(description: Option<&str>) -> &str {
    description.unwrap_or("")
}

fn deprecation_status(value: &EnumValue) -> String {
    if value.is_deprecated {
        format!(
            "is deprecated ({})",
            value.deprecation_reason.as_deref().unwrap_or("")
        )
    } else {
        "is not deprecated".to_string()
    }
}

/// Checks shared by every kind: a missing counterpart, a different kind or a
/// different name. Any of these ends the comparison of the type.
pub(crate) fn common_type_diffs(
    this: &Arc<NamedType>,
    other: Option<&Arc<NamedType>>,
    labels: &Labels,
) -> Option<Diff> {
    let Some(other) = other else {
        let description = format!("Type missing from {}: `{}`.", labels.other, this.name());
        return Some(Diff::new(
            Some(this),
            None,
            DiffKind::TypeMissing,
            ChangeType::Removed,
            description,
            false,
        ));
    };

    if this.kind() != other.kind() {
        let description = format!(
            "Type mismatch: {}: `{}: {}` vs. {}: `{}: {}`.",
            labels.this,
            this.name(),
            this.kind(),
            labels.other,
            other.name(),
            other.kind()
        );
        return Some(Diff::new(
            Some(this),
            Some(other),
            DiffKind::BaseTypeDiff,
            ChangeType::Modified,
            description,
            true,
        ));
    }

    if this.name() != other.name() {
        let description = format!(
            "Type name difference. {}: `{}` vs. {}: `{}`.",
            labels.this,
            this.name(),
            labels.other,
            other.name()
        );
        return Some(Diff::new(
            Some(this),
            Some(other),
            DiffKind::TypeNameDiff,
            ChangeType::Modified,
            description,
            true,
        ));
    }

    None
}

fn diff_type_description(subjects: Subjects<'_>, labels: &Labels) -> Option<Diff> {
    let (this, other) = (subjects.this, subjects.other);
    if this.description() == other.description() {
        return None;
    }
    let description = format!(
        "Description diff on type {}. {}: `\"{}\"` vs. {}: `\"{}\"`.",
        this.name(),
        labels.this,
        text(this.description()),
        labels.other,
        text(other.description())
    );
    Some(Diff::new(
        Some(this),
        Some(other),
        DiffKind::TypeDescriptionDiff,
        ChangeType::Modified,
        description,
        true,
    ))
}

/// Diff enum values keyed by name.
fn diff_enum_values(
    this_values: &[EnumValue],
    other_values: &[EnumValue],
    subjects: Subjects<'_>,
    labels: &Labels,
) -> Vec<Diff> {
    let mut diffs = Vec::new();
    let type_name = subjects.this.name();
    let (a, b) = (Some(subjects.this), Some(subjects.other));

    let this_by_name: HashMap<&str, &EnumValue> =
        this_values.iter().map(|v| (v.name.as_str(), v)).collect();
    let other_by_name: HashMap<&str, &EnumValue> =
        other_values.iter().map(|v| (v.name.as_str(), v)).collect();

    for value in this_values {
        let Some(other_value) = other_by_name.get(value.name.as_str()) else {
            // Removed values are breaking
            let description = format!(
                "Enum value missing from {}: `\"{}.{}\"`.",
                labels.other, type_name, value.name
            );
            diffs.push(Diff::new(a, b, DiffKind::EnumDiff, ChangeType::Removed, description, false));
            continue;
        };

        if value.description != other_value.description {
            let description = format!(
                "Description diff on enum value {}.{}. {}: `\"{}\"` vs. {}: `\"{}\"`.",
                type_name,
                value.name,
                labels.this,
                text(value.description.as_deref()),
                labels.other,
                text(other_value.description.as_deref())
            );
            diffs.push(Diff::new(a, b, DiffKind::EnumDiff, ChangeType::Modified, description, true));
        }

        let this_status = deprecation_status(value);
        let other_status = deprecation_status(other_value);
        if this_status != other_status {
            let description = format!(
                "Deprecation diff on enum value {}.{}. {}: `{}` vs. {}: `{}`.",
                type_name, value.name, labels.this, this_status, labels.other, other_status
            );
            diffs.push(Diff::new(a, b, DiffKind::EnumDiff, ChangeType::Modified, description, true));
        }
    }

    for value in other_values {
        if !this_by_name.contains_key(value.name.as_str()) {
            let description = format!(
                "Enum value missing from {}: `\"{}.{}\"`.",
                labels.this, type_name, value.name
            );
            diffs.push(Diff::new(a, b, DiffKind::EnumDiff, ChangeType::Added, description, true));
        }
    }

    diffs
}

/// Diff the fields of two object-like types.
fn diff_fields(
    this_fields: &BTreeMap<String, Field>,
    other_fields: &BTreeMap<String, Field>,
    subjects: Subjects<'_>,
    labels: &Labels,
) -> Vec<Diff> {
    let mut diffs = Vec::new();
    let type_name = subjects.this.name();
    let (a, b) = (Some(subjects.this), Some(subjects.other));

    for (name, this_field) in this_fields {
        // Removed fields are breaking
        let Some(other_field) = other_fields.get(name) else {
            let description = format!(
                "Field missing from {}: `{}.{}`.",
                labels.other,
                type_name,
                field_signature(this_field)
            );
            diffs.push(Diff::new(a, b, DiffKind::FieldMissing, ChangeType::Removed, description, false));
            continue;
        };

        let this_type = type_signature(&this_field.type_ref);
        let other_type = type_signature(&other_field.type_ref);
        if this_type != other_type {
            // Only dropping a non-null wrapper keeps existing clients working
            let backward_compatible = this_type == format!("{}!", other_type);
            let description = format!(
                "Field type changed on field {}.{} from : `\"{}\"` to `\"{}\"`.",
                type_name, this_field.name, this_type, other_type
            );
            diffs.push(Diff::new(
                a,
                b,
                DiffKind::FieldDiff,
                ChangeType::Modified,
                description,
                backward_compatible,
            ));
        }

        if this_field.description != other_field.description {
            let description = format!(
                "Description diff on field {}.{}. {}: `\"{}\"` vs. {}: `\"{}\"`.",
                type_name,
                name,
                labels.this,
                text(this_field.description.as_deref()),
                labels.other,
                text(other_field.description.as_deref())
            );
            diffs.push(Diff::new(
                a,
                b,
                DiffKind::FieldDescriptionDiff,
                ChangeType::Modified,
                description,
                true,
            ));
        }

        diffs.extend(diff_arguments(this_field, other_field, subjects, labels));
        diffs.extend(diff_arg_descriptions(this_field, other_field, subjects, labels));
    }

    for (name, other_field) in other_fields {
        if !this_fields.contains_key(name) {
            let description = format!(
                "Field missing from {}: `{}.{}`.",
                labels.this,
                type_name,
                field_signature(other_field)
            );
            diffs.push(Diff::new(a, b, DiffKind::FieldMissing, ChangeType::Added, description, true));
        }
    }

    diffs
}

fn argument_types(args: &[Argument]) -> HashMap<&str, String> {
    args.iter()
        .map(|arg| (arg.name.as_str(), type_signature(&arg.type_ref)))
        .collect()
}

/// Diff the arguments of a field present on both sides.
///
/// A new argument is always reported as compatible, even when it is non-null.
fn diff_arguments(
    this_field: &Field,
    other_field: &Field,
    subjects: Subjects<'_>,
    labels: &Labels,
) -> Vec<Diff> {
    let mut diffs = Vec::new();
    let (a, b) = (Some(subjects.this), Some(subjects.other));

    let this_types = argument_types(&this_field.args);
    let other_types = argument_types(&other_field.args);

    for arg in &this_field.args {
        let this_type = type_signature(&arg.type_ref);
        match other_types.get(arg.name.as_str()) {
            None => {
                let description = format!(
                    "Argument missing from {}: `{}.{}({}: {})`.",
                    labels.other,
                    subjects.this.name(),
                    this_field.name,
                    arg.name,
                    this_type
                );
                diffs.push(Diff::new(a, b, DiffKind::ArgDiff, ChangeType::Removed, description, false));
            }
            Some(other_type) if *other_type != this_type => {
                let description = format!(
                    "Argument type diff on field {}.{}. {}: `{}: {}` vs. {}: `{}: {}`.",
                    subjects.this.name(),
                    this_field.name,
                    labels.this,
                    arg.name,
                    this_type,
                    labels.other,
                    arg.name,
                    other_type
                );
                diffs.push(Diff::new(a, b, DiffKind::ArgDiff, ChangeType::Modified, description, false));
            }
            Some(_) => {}
        }
    }

    for arg in &other_field.args {
        if !this_types.contains_key(arg.name.as_str()) {
            let description = format!(
                "Argument missing from {}: `{}.{}({}: {})`.",
                labels.this,
                subjects.other.name(),
                other_field.name,
                arg.name,
                type_signature(&arg.type_ref)
            );
            diffs.push(Diff::new(a, b, DiffKind::ArgDiff, ChangeType::Added, description, true));
        }
    }

    diffs
}

/// Diff descriptions of arguments present on both sides, in `other`'s order.
fn diff_arg_descriptions(
    this_field: &Field,
    other_field: &Field,
    subjects: Subjects<'_>,
    labels: &Labels,
) -> Vec<Diff> {
    other_field
        .args
        .iter()
        .filter_map(|other_arg| {
            let this_arg = this_field.arg(&other_arg.name)?;
            if this_arg.description == other_arg.description {
                return None;
            }
            let description = format!(
                "Description diff on argument {}.{}({}). {}: `\"{}\"` vs. {}: `\"{}\"`.",
                subjects.this.name(),
                this_field.name,
                other_arg.name,
                labels.this,
                text(this_arg.description.as_deref()),
                labels.other,
                text(other_arg.description.as_deref())
            );
            Some(
                Diff::new(
                    Some(subjects.this),
                    Some(subjects.other),
                    DiffKind::ArgDescriptionDiff,
                    ChangeType::Modified,
                    description,
                    true,
                )
                .with_fields(this_field, other_field),
            )
        })
        .collect()
}

fn interfaces_covered(names: &[String], by: &[String]) -> bool {
    let by: HashSet<&str> = by.iter().map(|s| s.as_str()).collect();
    names.iter().all(|name| by.contains(name.as_str()))
}

/// Compare implemented interfaces by name.
///
/// When the two sets differ, one breaking diff is reported per direction:
/// the second one renders the lists swapped.
fn diff_interfaces(
    this_interfaces: &[String],
    other_interfaces: &[String],
    subjects: Subjects<'_>,
    labels: &Labels,
) -> Vec<Diff> {
    if interfaces_covered(this_interfaces, other_interfaces)
        && interfaces_covered(other_interfaces, this_interfaces)
    {
        return Vec::new();
    }

    [
        (this_interfaces, other_interfaces),
        (other_interfaces, this_interfaces),
    ]
    .into_iter()
    .map(|(first, second)| {
        let description = format!(
            "Interface diff on type {}. {}: `{}` vs. {}: `{}`.",
            subjects.this.name(),
            labels.this,
            first.join(", "),
            labels.other,
            second.join(", ")
        );
        Diff::new(
            Some(subjects.this),
            Some(subjects.other),
            DiffKind::InterfaceDiff,
            ChangeType::Modified,
            description,
            false,
        )
    })
    .collect()
}

fn diff_object_like<T: ObjectLike + ?Sized>(
    this: &T,
    other: &T,
    subjects: Subjects<'_>,
    labels: &Labels,
) -> Vec<Diff> {
    let mut diffs = diff_fields(this.fields(), other.fields(), subjects, labels);
    diffs.extend(diff_type_description(subjects, labels));
    if let (Some(this_interfaces), Some(other_interfaces)) = (this.interfaces(), other.interfaces()) {
        diffs.extend(diff_interfaces(this_interfaces, other_interfaces, subjects, labels));
    }
    diffs
}

impl TypeComparator for ScalarType {
    fn compare(&self, _other: &Self, subjects: Subjects<'_>, labels: &Labels) -> Vec<Diff> {
        diff_type_description(subjects, labels).into_iter().collect()
    }
}

impl TypeComparator for EnumType {
    fn compare(&self, other: &Self, subjects: Subjects<'_>, labels: &Labels) -> Vec<Diff> {
        let mut diffs = diff_enum_values(&self.values, &other.values, subjects, labels);
        diffs.extend(diff_type_description(subjects, labels));
        diffs
    }
}

impl TypeComparator for UnionType {
    fn compare(&self, other: &Self, subjects: Subjects<'_>, labels: &Labels) -> Vec<Diff> {
        let mut diffs: Vec<Diff> = diff_type_description(subjects, labels).into_iter().collect();

        let this_members = sorted_members(&self.members);
        let other_members = sorted_members(&other.members);
        if this_members != other_members {
            // Growth that keeps the old member list intact is treated as compatible
            let backward_compatible = other_members.contains(&this_members);
            let description = format!(
                "Difference in union type {}. {}: `{}` vs. {}: `{}`.",
                self.name, labels.this, this_members, labels.other, other_members
            );
            diffs.push(Diff::new(
                Some(subjects.this),
                Some(subjects.other),
                DiffKind::UnionTypeDiff,
                ChangeType::Modified,
                description,
                backward_compatible,
            ));
        }
        diffs
    }
}

fn sorted_members(members: &[String]) -> String {
    let mut names: Vec<&str> = members.iter().map(|m| m.as_str()).collect();
    names.sort_unstable();
    names.join(" | ")
}

impl TypeComparator for ObjectType {
    fn compare(&self, other: &Self, subjects: Subjects<'_>, labels: &Labels) -> Vec<Diff> {
        diff_object_like(self, other, subjects, labels)
    }
}

impl TypeComparator for InterfaceType {
    fn compare(&self, other: &Self, subjects: Subjects<'_>, labels: &Labels) -> Vec<Diff> {
        diff_object_like(self, other, subjects, labels)
    }
}

impl TypeComparator for InputObjectType {
    fn compare(&self, other: &Self, subjects: Subjects<'_>, labels: &Labels) -> Vec<Diff> {
        diff_object_like(self, other, subjects, labels)
    }
}

/// Diff a single type against its counterpart.
///
/// Labels default to "this type" / "other type".
pub fn diff_type(
    this: &Arc<NamedType>,
    other: Option<&Arc<NamedType>>,
    options: &DiffOptions,
) -> Vec<Diff> {
    let labels = Labels::resolve(options, Scope::Type);
    diff_types(this, other, &labels)
}

/// Report every difference between `this` schema and `other`.
///
/// Labels default to "this schema" / "other schema" and are passed down to
/// every nested comparison. Fails only when `other` is absent.
pub fn diff_schema(
    this: &Schema,
    other: Option<&Schema>,
    options: &DiffOptions,
) -> Result<Vec<Diff>> {
    let other = other
        .ok_or_else(|| SchemaError::invalid_argument("Cannot diff with a missing schema."))?;
    let labels = Labels::resolve(options, Scope::Schema);

    debug!(
        this_types = this.len(),
        other_types = other.len(),
        "diffing schemas"
    );

    let mut diffs = Vec::new();
    for (name, this_type) in this.types() {
        diffs.extend(diff_types(this_type, other.get(name), &labels));
    }

    // Types only in other are additions
    for (name, other_type) in other.types() {
        if !this.contains(name) {
            let description = format!("Type missing from {}: `{}`.", labels.this, name);
            diffs.push(Diff::new(
                None,
                Some(other_type),
                DiffKind::TypeMissing,
                ChangeType::Added,
                description,
                true,
            ));
        }
    }

    let diffs = dedupe(diffs);
    debug!(
        diffs = diffs.len(),
        breaking = diffs.iter().filter(|d| d.is_breaking()).count(),
        "schema diff complete"
    );
    Ok(diffs)
}

/// Diff two schemas and wrap the result with summary statistics and timing.
pub fn diff_report(
    this: &Schema,
    other: Option<&Schema>,
    options: &DiffOptions,
) -> Result<DiffReport> {
    let start = Instant::now();
    let mut report = DiffReport::default();

    for diff in diff_schema(this, other, options)? {
        report.add_diff(diff);
    }

    report.finalize(start.elapsed().as_secs_f64() * 1000.0);
    Ok(report)
}
