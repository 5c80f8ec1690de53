//! Schema merge engine.
//!
//! `merge_schema(this, other)` builds a new schema holding every type of both
//! inputs. Where both define a name, `other` wins: scalars and enums are
//! replaced outright, object-like types take `other`'s fields over `this`'s,
//! and unions and object interface lists are unioned.
//!
//! Neither input is modified. Definitions the merge does not need to combine
//! are shared with the inputs through their `Arc`s.

use std::collections::HashSet;

use tracing::debug;

use crate::dispatch::{merge_types, MergeOutcome, TypeMerger};
use crate::error::{Result, SchemaError};
use crate::types::{
    EnumType, InputObjectType, InterfaceType, NamedType, ObjectLike, ObjectType, ScalarType,
    Schema, TypeKind, UnionType,
};

/// Merge `other` into a copy of `this`.
///
/// Returns a schema equal to `this` when `other` is absent. Fails with
/// [`SchemaError::TypeMismatch`] when a type name is bound to an object-like
/// or union type on one side and to a different kind on the other.
pub fn merge_schema(this: &Schema, other: Option<&Schema>) -> Result<Schema> {
    let Some(other) = other else {
        return Ok(this.clone());
    };

    debug!(
        this_types = this.len(),
        other_types = other.len(),
        "merging schemas"
    );

    let mut merged = Schema::new();
    let mut combined = 0usize;
    for (name, this_type) in this.types() {
        let other_type = other.get(name);
        if other_type.is_some() {
            combined += 1;
        }
        merged.insert_shared(name, merge_types(this_type, other_type)?);
    }

    for (name, other_type) in other.types() {
        if !this.contains(name) {
            merged.insert_shared(name, other_type.clone());
        }
    }

    debug!(types = merged.len(), combined, "schema merge complete");
    Ok(merged)
}

/// `other` if present, else `this`.
pub fn overwrite<'a, T: ?Sized>(this: &'a T, other: Option<&'a T>) -> &'a T {
    other.unwrap_or(this)
}

fn mismatch(name: &str, this_kind: TypeKind, other: &NamedType) -> SchemaError {
    SchemaError::TypeMismatch {
        name: name.to_string(),
        this_kind,
        other_kind: other.kind(),
    }
}

/// Copy `this` and lay `other`'s fields over it.
fn merge_fields<T: ObjectLike + Clone>(this: &T, other: &T) -> T {
    let mut merged = this.clone();
    let fields = merged.fields_mut();
    for (name, field) in other.fields() {
        fields.insert(name.clone(), field.clone());
    }
    merged
}

/// `first` followed by the names of `second` it does not already hold.
fn union_names(first: &[String], second: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = first.iter().map(|s| s.as_str()).collect();
    let mut names = first.to_vec();
    for name in second {
        if seen.insert(name.as_str()) {
            names.push(name.clone());
        }
    }
    names
}

impl TypeMerger for ScalarType {
    fn merge_with(&self, _other: &NamedType) -> Result<MergeOutcome> {
        Ok(MergeOutcome::Overwrite)
    }
}

impl TypeMerger for EnumType {
    fn merge_with(&self, _other: &NamedType) -> Result<MergeOutcome> {
        Ok(MergeOutcome::Overwrite)
    }
}

impl TypeMerger for ObjectType {
    fn merge_with(&self, other: &NamedType) -> Result<MergeOutcome> {
        let NamedType::Object(other) = other else {
            return Err(mismatch(&self.name, TypeKind::Object, other));
        };
        let mut merged = merge_fields(self, other);
        merged.interfaces = union_names(&self.interfaces, &other.interfaces);
        Ok(MergeOutcome::Merged(merged.into()))
    }
}

impl TypeMerger for InterfaceType {
    fn merge_with(&self, other: &NamedType) -> Result<MergeOutcome> {
        let NamedType::Interface(other) = other else {
            return Err(mismatch(&self.name, TypeKind::Interface, other));
        };
        Ok(MergeOutcome::Merged(merge_fields(self, other).into()))
    }
}

impl TypeMerger for InputObjectType {
    fn merge_with(&self, other: &NamedType) -> Result<MergeOutcome> {
        let NamedType::InputObject(other) = other else {
            return Err(mismatch(&self.name, TypeKind::InputObject, other));
        };
        Ok(MergeOutcome::Merged(merge_fields(self, other).into()))
    }
}

impl TypeMerger for UnionType {
    fn merge_with(&self, other: &NamedType) -> Result<MergeOutcome> {
        let NamedType::Union(other) = other else {
            return Err(mismatch(&self.name, TypeKind::Union, other));
        };
        let mut merged = self.clone();
        merged.members = union_names(&self.members, &other.members);
        Ok(MergeOutcome::Merged(merged.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, TypeRef};

    fn make_pet(fields: &[(&str, TypeRef)]) -> ObjectType {
        fields.iter().fold(ObjectType::new("Pet"), |pet, (name, type_ref)| {
            pet.with_field(Field::new(*name, type_ref.clone()))
        })
    }

    #[test]
    fn test_overwrite() {
        let a = TypeRef::named("String");
        let b = TypeRef::named("ID");
        assert_eq!(overwrite(&a, Some(&b)), &b);
        assert_eq!(overwrite(&a, None), &a);
    }

    #[test]
    fn test_merge_schema_without_other_is_equal() {
        let schema = Schema::from_types([make_pet(&[("name", TypeRef::named("String"))])]);
        let merged = merge_schema(&schema, None).unwrap();
        assert_eq!(merged, schema);
    }

    #[test]
    fn test_merge_schema_keeps_both_sides() {
        let a = Schema::from_types([ScalarType::new("Float")]);
        let b = Schema::from_types([ScalarType::new("Int")]);
        let merged = merge_schema(&a, Some(&b)).unwrap();
        assert_eq!(merged.type_names().collect::<Vec<_>>(), vec!["Float", "Int"]);
        assert!(merged.shares_type_with(&a, "Float"));
        assert!(merged.shares_type_with(&b, "Int"));
    }

    #[test]
    fn test_merge_scalar_and_enum_overwrite() {
        let a = Schema::from_types([
            NamedType::from(ScalarType::new("Date")),
            NamedType::from(EnumType::new("Color").with_values(&["RED", "GREEN"])),
        ]);
        let b = Schema::from_types([
            NamedType::from(ScalarType::new("Date").with_description("ISO-8601")),
            NamedType::from(EnumType::new("Color").with_values(&["BLUE"])),
        ]);

        let merged = merge_schema(&a, Some(&b)).unwrap();
        assert!(merged.shares_type_with(&b, "Date"));
        match merged.get("Color").map(|t| t.as_ref()) {
            Some(NamedType::Enum(color)) => {
                let names: Vec<&str> = color.values.iter().map(|v| v.name.as_str()).collect();
                assert_eq!(names, vec!["BLUE"]);
            }
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_object_fields_other_wins() {
        let a = Schema::from_types([make_pet(&[
            ("name", TypeRef::named("String")),
            ("age", TypeRef::named("Int")),
        ])]);
        let b = Schema::from_types([make_pet(&[
            ("name", TypeRef::named("String").non_null()),
            ("owner", TypeRef::named("Person")),
        ])]);

        let merged = merge_schema(&a, Some(&b)).unwrap();
        let fields = merged.get("Pet").and_then(|t| t.fields()).unwrap();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["age", "name", "owner"]);
        assert_eq!(fields["name"].type_ref, TypeRef::named("String").non_null());
    }

    #[test]
    fn test_merge_object_interfaces_union() {
        let a = ObjectType::new("FieldOption").implements("CmsItem").implements("Node");
        let b = ObjectType::new("FieldOption").implements("Node").implements("Sortable");

        match a.merge_with(&b.into()).unwrap() {
            MergeOutcome::Merged(NamedType::Object(merged)) => {
                assert_eq!(merged.interfaces, vec!["CmsItem", "Node", "Sortable"]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_merge_union_members() {
        let a = Schema::from_types([UnionType::new("Pet", &["Cat", "Dog"])]);
        let b = Schema::from_types([UnionType::new("Pet", &["Dog", "Fish"])]);

        let merged = merge_schema(&a, Some(&b)).unwrap();
        match merged.get("Pet").map(|t| t.as_ref()) {
            Some(NamedType::Union(pet)) => assert_eq!(pet.members, vec!["Cat", "Dog", "Fish"]),
            other => panic!("expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_kind_mismatch() {
        let a = Schema::from_types([ObjectType::new("Pet")]);
        let b = Schema::from_types([UnionType::new("Pet", &["Cat"])]);

        let err = merge_schema(&a, Some(&b)).unwrap_err();
        assert_eq!(
            err,
            SchemaError::TypeMismatch {
                name: "Pet".to_string(),
                this_kind: TypeKind::Object,
                other_kind: TypeKind::Union,
            }
        );
    }

    #[test]
    fn test_merge_scalar_over_object_overwrites() {
        let a = Schema::from_types([ScalarType::new("Pet")]);
        let b = Schema::from_types([ObjectType::new("Pet")]);

        let merged = merge_schema(&a, Some(&b)).unwrap();
        assert_eq!(merged.get("Pet").map(|t| t.kind()), Some(TypeKind::Object));
    }
}
