//! Data models for schema graphs.
//!
//! These types represent a fully resolved GraphQL-like schema: named types of
//! six kinds, their fields, arguments and enum values, and the type references
//! that tie them together. Schemas are built by an external collaborator (or
//! deserialized with serde) and treated as read-only by the differ and merger.
//!
//! Types inside a [`Schema`] are held behind [`Arc`] so that a merged schema can
//! share every definition it did not touch with its inputs. The only mutating
//! accessor, [`Schema::type_mut`], is copy-on-write.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Kind of a named type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Scalar,
    Enum,
    Union,
    Object,
    Interface,
    InputObject,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "Scalar",
            TypeKind::Enum => "Enum",
            TypeKind::Union => "Union",
            TypeKind::Object => "Object",
            TypeKind::Interface => "Interface",
            TypeKind::InputObject => "InputObject",
        }
    }

    /// Object, interface and input object types all own a field map.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            TypeKind::Object | TypeKind::Interface | TypeKind::InputObject
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a named type, optionally wrapped in list / non-null modifiers.
///
/// `[Tag!]!` is `NonNull(List(NonNull(Named("Tag"))))`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wrap this reference in a list modifier.
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Wrap this reference in a non-null modifier.
    pub fn non_null(self) -> Self {
        TypeRef::NonNull(Box::new(self))
    }

    /// Name of the innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

/// A field argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub type_ref: TypeRef,
    #[serde(default)]
    pub description: Option<String>,
    /// Default value, already rendered as source text (e.g. `"10"` or `"\"asc\""`).
    #[serde(default)]
    pub default_value: Option<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            description: None,
            default_value: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_default(mut self, default_value: &str) -> Self {
        self.default_value = Some(default_value.to_string());
        self
    }
}

/// A field on an object, interface or input object type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeRef,
    #[serde(default)]
    pub description: Option<String>,
    /// Arguments in declaration order. Input object fields have none.
    #[serde(default)]
    pub args: Vec<Argument>,
}

impl Field {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            description: None,
            args: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    pub fn arg(&self, name: &str) -> Option<&Argument> {
        self.args.iter().find(|a| a.name == name)
    }
}

/// A single enum value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    /// Underlying value when it differs from the name.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            description: None,
            is_deprecated: false,
            deprecation_reason: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn deprecated(mut self, reason: Option<&str>) -> Self {
        self.is_deprecated = true;
        self.deprecation_reason = reason.map(|r| r.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_value(mut self, value: EnumValue) -> Self {
        self.values.push(value);
        self
    }

    /// Add several plain values at once.
    pub fn with_values(mut self, names: &[&str]) -> Self {
        self.values.extend(names.iter().map(|n| EnumValue::new(*n)));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Names of the object types this union may resolve to.
    pub members: Vec<String>,
}

impl UnionType {
    pub fn new(name: impl Into<String>, members: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: None,
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: BTreeMap<String, Field>,
    /// Names of implemented interfaces, in declaration order.
    #[serde(default)]
    pub interfaces: Vec<String>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: BTreeMap::new(),
            interfaces: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: BTreeMap<String, Field>,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputObjectType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: BTreeMap<String, Field>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

/// Shared view over the three kinds that own a field map.
pub trait ObjectLike {
    fn name(&self) -> &str;
    fn fields(&self) -> &BTreeMap<String, Field>;
    fn fields_mut(&mut self) -> &mut BTreeMap<String, Field>;

    /// Implemented interfaces; only object types have any.
    fn interfaces(&self) -> Option<&[String]> {
        None
    }
}

impl ObjectLike for ObjectType {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut BTreeMap<String, Field> {
        &mut self.fields
    }

    fn interfaces(&self) -> Option<&[String]> {
        Some(&self.interfaces)
    }
}

impl ObjectLike for InterfaceType {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut BTreeMap<String, Field> {
        &mut self.fields
    }
}

impl ObjectLike for InputObjectType {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut BTreeMap<String, Field> {
        &mut self.fields
    }
}

/// A named type of any kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NamedType {
    Scalar(ScalarType),
    Enum(EnumType),
    Union(UnionType),
    Object(ObjectType),
    Interface(InterfaceType),
    InputObject(InputObjectType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            NamedType::Scalar(t) => &t.name,
            NamedType::Enum(t) => &t.name,
            NamedType::Union(t) => &t.name,
            NamedType::Object(t) => &t.name,
            NamedType::Interface(t) => &t.name,
            NamedType::InputObject(t) => &t.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            NamedType::Scalar(t) => t.description.as_deref(),
            NamedType::Enum(t) => t.description.as_deref(),
            NamedType::Union(t) => t.description.as_deref(),
            NamedType::Object(t) => t.description.as_deref(),
            NamedType::Interface(t) => t.description.as_deref(),
            NamedType::InputObject(t) => t.description.as_deref(),
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            NamedType::Scalar(_) => TypeKind::Scalar,
            NamedType::Enum(_) => TypeKind::Enum,
            NamedType::Union(_) => TypeKind::Union,
            NamedType::Object(_) => TypeKind::Object,
            NamedType::Interface(_) => TypeKind::Interface,
            NamedType::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Object-like view of this type, if it owns fields.
    pub fn as_object_like(&self) -> Option<&dyn ObjectLike> {
        match self {
            NamedType::Object(t) => Some(t),
            NamedType::Interface(t) => Some(t),
            NamedType::InputObject(t) => Some(t),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&BTreeMap<String, Field>> {
        self.as_object_like().map(|t| t.fields())
    }
}

impl From<ScalarType> for NamedType {
    fn from(t: ScalarType) -> Self {
        NamedType::Scalar(t)
    }
}

impl From<EnumType> for NamedType {
    fn from(t: EnumType) -> Self {
        NamedType::Enum(t)
    }
}

impl From<UnionType> for NamedType {
    fn from(t: UnionType) -> Self {
        NamedType::Union(t)
    }
}

impl From<ObjectType> for NamedType {
    fn from(t: ObjectType) -> Self {
        NamedType::Object(t)
    }
}

impl From<InterfaceType> for NamedType {
    fn from(t: InterfaceType) -> Self {
        NamedType::Interface(t)
    }
}

impl From<InputObjectType> for NamedType {
    fn from(t: InputObjectType) -> Self {
        NamedType::InputObject(t)
    }
}

/// A schema: the full named-type graph, keyed by type name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    types: BTreeMap<String, Arc<NamedType>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from a list of types, each keyed by its own name.
    pub fn from_types<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NamedType>,
    {
        let mut schema = Self::new();
        for t in types {
            schema.insert(t);
        }
        schema
    }

    /// Insert a type under its own name, returning any previous definition.
    pub fn insert(&mut self, named: impl Into<NamedType>) -> Option<Arc<NamedType>> {
        let named = named.into();
        self.types.insert(named.name().to_string(), Arc::new(named))
    }

    /// Insert a shared definition under an explicit key.
    ///
    /// The key normally equals the type's name; the merger uses this to carry
    /// definitions over without copying them.
    pub fn insert_shared(
        &mut self,
        key: impl Into<String>,
        named: Arc<NamedType>,
    ) -> Option<Arc<NamedType>> {
        self.types.insert(key.into(), named)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<NamedType>> {
        self.types.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<NamedType>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Mutable access to a type. Copies the definition first if it is shared
    /// with another schema, so other holders never observe the change.
    pub fn type_mut(&mut self, name: &str) -> Option<&mut NamedType> {
        self.types.get_mut(name).map(Arc::make_mut)
    }

    /// Type names in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|k| k.as_str())
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, &Arc<NamedType>)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether both schemas hold the very same allocation for `name`.
    pub fn shares_type_with(&self, other: &Schema, name: &str) -> bool {
        match (self.types.get(name), other.types.get(name)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_kind_as_str() {
        assert_eq!(TypeKind::Object.as_str(), "Object");
        assert_eq!(TypeKind::InputObject.to_string(), "InputObject");
        assert!(TypeKind::Interface.is_object_like());
        assert!(!TypeKind::Union.is_object_like());
    }

    #[test]
    fn test_type_ref_builders() {
        let t = TypeRef::named("Tag").non_null().list().non_null();
        assert!(t.is_non_null());
        assert_eq!(t.named_type(), "Tag");
        assert!(!TypeRef::named("Tag").is_non_null());
    }

    #[test]
    fn test_named_type_accessors() {
        let object: NamedType = ObjectType::new("Pet")
            .with_description("A pet")
            .with_field(Field::new("name", TypeRef::named("String")))
            .into();
        assert_eq!(object.name(), "Pet");
        assert_eq!(object.description(), Some("A pet"));
        assert_eq!(object.kind(), TypeKind::Object);
        assert_eq!(object.fields().map(|f| f.len()), Some(1));

        let scalar: NamedType = ScalarType::new("Date").into();
        assert!(scalar.fields().is_none());
        assert!(scalar.as_object_like().is_none());
    }

    #[test]
    fn test_object_like_interfaces() {
        let object = ObjectType::new("FieldOption").implements("CmsItem");
        assert_eq!(object.interfaces(), Some(&["CmsItem".to_string()][..]));

        let iface = InterfaceType::new("CmsItem");
        assert!(iface.interfaces().is_none());
    }

    #[test]
    fn test_schema_insert_and_lookup() {
        let schema = Schema::from_types([
            NamedType::from(ScalarType::new("String")),
            NamedType::from(EnumType::new("Color").with_values(&["RED", "BLUE"])),
        ]);
        assert_eq!(schema.len(), 2);
        assert!(schema.contains("Color"));
        assert_eq!(schema.type_names().collect::<Vec<_>>(), vec!["Color", "String"]);
    }

    #[test]
    fn test_schema_type_mut_is_copy_on_write() {
        let original = Schema::from_types([ScalarType::new("Date")]);
        let mut copy = original.clone();
        assert!(copy.shares_type_with(&original, "Date"));

        if let Some(NamedType::Scalar(date)) = copy.type_mut("Date") {
            date.description = Some("ISO-8601".to_string());
        }

        assert!(!copy.shares_type_with(&original, "Date"));
        assert_eq!(original.get("Date").and_then(|t| t.description()), None);
        assert_eq!(
            copy.get("Date").and_then(|t| t.description()),
            Some("ISO-8601")
        );
    }

    #[test]
    fn test_schema_deserializes_from_json() {
        let json = r#"{
            "types": {
                "Pet": {
                    "kind": "Object",
                    "name": "Pet",
                    "fields": {
                        "name": { "name": "name", "type_ref": { "NonNull": { "Named": "String" } } }
                    }
                },
                "Color": { "kind": "Enum", "name": "Color", "values": [ { "name": "RED" } ] }
            }
        }"#;

        let schema: Schema = serde_json::from_str(json).unwrap();
        let pet = schema.get("Pet").unwrap();
        assert_eq!(pet.kind(), TypeKind::Object);
        let name = &pet.fields().unwrap()["name"];
        assert_eq!(name.type_ref, TypeRef::named("String").non_null());
        assert!(name.args.is_empty());
        assert_eq!(schema.get("Color").unwrap().kind(), TypeKind::Enum);
    }
}
