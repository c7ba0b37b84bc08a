//! Casing helpers for generated identifiers.

use heck::ToLowerCamelCase;
use heck::ToUpperCamelCase;

/// `PascalCase`, used for type names and enum variants.
pub fn pascal_case(name: &str) -> String {
	name.to_upper_camel_case()
}

/// `camelCase`, used for properties, functions and variables.
pub fn camel_case(name: &str) -> String {
	name.to_lower_camel_case()
}

/// Whether `name` can be emitted verbatim as a type annotation description.
pub(crate) fn is_plain_identifier(name: &str) -> bool {
	!name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
