//! Canonical rendering of type references and field signatures.
//!
//! Two type references are considered equal when their renderings are equal,
//! so this is used both as a comparison key and in diff descriptions.

use std::fmt;

use crate::types::{Argument, Field, TypeRef};

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// Canonical type string of a type reference, e.g. `[Tag!]!`.
pub fn type_signature(type_ref: &TypeRef) -> String {
    type_ref.to_string()
}

/// Render an argument as `name: Type` or `name: Type = default`.
pub fn argument_signature(arg: &Argument) -> String {
    let mut s = format!("{}: {}", arg.name, arg.type_ref);
    if let Some(ref d) = arg.default_value {
        s.push_str(" = ");
        s.push_str(d);
    }
    s
}

/// Render an argument list as `(a: A, b: B = 1)`; empty when there are no
/// arguments.
pub fn arguments_signature(args: &[Argument]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let params: Vec<String> = args.iter().map(argument_signature).collect();
    format!("({})", params.join(", "))
}

/// Full field signature: `name(args): Type`.
pub fn field_signature(field: &Field) -> String {
    format!(
        "{}{}: {}",
        field.name,
        arguments_signature(&field.args),
        field.type_ref
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_signature_named() {
        assert_eq!(type_signature(&TypeRef::named("String")), "String");
    }

    #[test]
    fn test_type_signature_wrapped() {
        let t = TypeRef::named("Tag").non_null().list();
        assert_eq!(type_signature(&t), "[Tag!]");
        assert_eq!(type_signature(&t.non_null()), "[Tag!]!");

        let nested = TypeRef::named("Int").list().list().non_null();
        assert_eq!(type_signature(&nested), "[[Int]]!");
    }

    #[test]
    fn test_field_signature_simple() {
        let field = Field::new("displayName", TypeRef::named("String"));
        assert_eq!(field_signature(&field), "displayName: String");
    }

    #[test]
    fn test_field_signature_with_args() {
        let field = Field::new("FieldOption", TypeRef::named("FieldOption"))
            .with_arg(Argument::new("contentId", TypeRef::named("ID").non_null()))
            .with_arg(Argument::new("limit", TypeRef::named("Int")).with_default("10"));
        assert_eq!(
            field_signature(&field),
            "FieldOption(contentId: ID!, limit: Int = 10): FieldOption"
        );
    }

    #[test]
    fn test_arguments_signature_empty() {
        assert_eq!(arguments_signature(&[]), "");
    }
}
