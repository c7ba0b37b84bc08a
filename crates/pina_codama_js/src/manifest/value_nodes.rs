use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use codama_nodes::BytesEncoding;
use codama_nodes::BytesValueNode;
use codama_nodes::ConstantValueNode;
use codama_nodes::EnumValueNode;
use codama_nodes::EnumVariantData;
use codama_nodes::HasKind;
use codama_nodes::Number;
use codama_nodes::StructValueNode;
use codama_nodes::TypeNode;
use codama_nodes::ValueNode;
use tracing::trace;

use super::TypeManifest;
use super::TypeManifestVisitor;
use crate::error::RenderError;
use crate::error::Result;
use crate::expr::Expr;
use crate::modules::Reference;
use crate::modules::UMI;
use crate::modules::UMI_SERIALIZERS;
use crate::naming::camel_case;
use crate::naming::pascal_case;
use crate::nodes::BytesEncodingExt;
use crate::nodes::is_scalar_enum;
use crate::nodes::resolve_nested;

/// Whether the enum named `name` is scalar.
///
/// A live enum node found in the graph decides on its own. Otherwise the
/// enum is scalar unless `non_scalar_enums` lists it.
pub fn enum_reference_is_scalar(
	live: Option<&TypeNode>,
	name: &str,
	non_scalar_enums: &[String],
) -> bool {
	match live.map(resolve_nested) {
		Some(TypeNode::Enum(node)) => is_scalar_enum(node),
		_ => !non_scalar_enums.iter().any(|candidate| candidate == name),
	}
}

fn json_string(text: &str) -> String {
	serde_json::Value::String(text.to_owned()).to_string()
}

fn number_literal(number: Number) -> String {
	match number {
		Number::UnsignedInteger(value) => value.to_string(),
		Number::SignedInteger(value) => value.to_string(),
		Number::Float(value) => value.to_string(),
	}
}

fn join_values(items: &[TypeManifest]) -> String {
	items
		.iter()
		.map(|item| item.value.as_str())
		.collect::<Vec<_>>()
		.join(", ")
}

/// Decode a bytes value into raw bytes. Base58 data has no decoder here and
/// is rendered through the runtime serializer instead.
fn decode_bytes(node: &BytesValueNode) -> Result<Option<Vec<u8>>> {
	let invalid = |reason: String| {
		RenderError::InvalidBytes {
			encoding: node.encoding.as_str(),
			data: node.data.clone(),
			reason,
		}
	};

	match node.encoding {
		BytesEncoding::Utf8 => Ok(Some(node.data.as_bytes().to_vec())),
		BytesEncoding::Base16 => {
			hex::decode(&node.data)
				.map(Some)
				.map_err(|error| invalid(error.to_string()))
		}
		BytesEncoding::Base64 => {
			STANDARD
				.decode(&node.data)
				.map(Some)
				.map_err(|error| invalid(error.to_string()))
		}
		BytesEncoding::Base58 => Ok(None),
	}
}

impl TypeManifestVisitor<'_> {
	pub fn visit_value(&mut self, node: &ValueNode) -> Result<TypeManifest> {
		trace!(kind = node.kind(), "visiting value node");

		match node {
			ValueNode::Number(node) => Ok(TypeManifest::with_value(number_literal(node.number))),
			ValueNode::Boolean(node) => Ok(TypeManifest::with_value(node.boolean.to_string())),
			ValueNode::String(node) => Ok(TypeManifest::with_value(json_string(&node.string))),
			ValueNode::Bytes(node) => Self::visit_bytes_value(node),
			ValueNode::PublicKey(node) => {
				let mut manifest =
					TypeManifest::with_value(format!("publicKey({})", json_string(&node.public_key)));
				manifest.value_imports.add(UMI, "publicKey");
				Ok(manifest)
			}
			ValueNode::Array(node) => self.visit_value_list(&node.items, "[", "]"),
			ValueNode::Tuple(node) => self.visit_value_list(&node.items, "[", "]"),
			ValueNode::Set(node) => self.visit_value_list(&node.items, "new Set([", "])"),
			ValueNode::Map(node) => {
				let mut manifest = TypeManifest::default();
				let mut entries = Vec::with_capacity(node.entries.len());
				for entry in &node.entries {
					let key = self.visit_value(&entry.key)?;
					let value = self.visit_value(&entry.value)?;
					manifest.merge_imports([&key, &value]);
					entries.push(format!("[{}, {}]", key.value, value.value));
				}
				manifest.value = format!("new Map([{}])", entries.join(", "));
				Ok(manifest)
			}
			ValueNode::Struct(node) => self.visit_struct_value(node),
			ValueNode::Enum(node) => self.visit_enum_value(node),
			ValueNode::Some(node) => {
				let inner = self.visit_value(&node.value)?;
				let mut manifest = TypeManifest::with_value(format!("some({})", inner.value));
				manifest.merge_imports([&inner]);
				manifest.value_imports.add(UMI, "some");
				Ok(manifest)
			}
			ValueNode::None(_) => {
				let mut manifest = TypeManifest::with_value("none()");
				manifest.value_imports.add(UMI, "none");
				Ok(manifest)
			}
			ValueNode::Constant(node) => self.visit_constant_value(node),
		}
	}

	fn visit_bytes_value(node: &BytesValueNode) -> Result<TypeManifest> {
		let Some(bytes) = decode_bytes(node)? else {
			let mut manifest =
				TypeManifest::with_value(format!("base58.serialize({})", json_string(&node.data)));
			manifest.value_imports.add(UMI_SERIALIZERS, "base58");
			return Ok(manifest);
		};

		let bytes = bytes
			.iter()
			.map(u8::to_string)
			.collect::<Vec<_>>()
			.join(", ");
		Ok(TypeManifest::with_value(format!("new Uint8Array([{bytes}])")))
	}

	fn visit_value_list(&mut self, items: &[ValueNode], open: &str, close: &str) -> Result<TypeManifest> {
		let items = items
			.iter()
			.map(|item| self.visit_value(item))
			.collect::<Result<Vec<_>>>()?;

		let mut manifest = TypeManifest::with_value(format!("{open}{}{close}", join_values(&items)));
		manifest.merge_imports(&items);
		Ok(manifest)
	}

	fn visit_struct_value(&mut self, node: &StructValueNode) -> Result<TypeManifest> {
		let mut manifest = TypeManifest::default();
		let mut fields = Vec::with_capacity(node.fields.len());

		for field in &node.fields {
			let value = self.visit_value(&field.value)?;
			manifest.merge_imports([&value]);
			fields.push(format!("{}: {}", camel_case(&field.name), value.value));
		}

		manifest.value = if fields.is_empty() {
			"{}".to_owned()
		} else {
			format!("{{ {} }}", fields.join(", "))
		};
		Ok(manifest)
	}

	fn visit_enum_value(&mut self, node: &EnumValueNode) -> Result<TypeManifest> {
		let module = self.modules.module_for(Reference::DefinedType(&node.r#enum));
		let live = self
			.linkables
			.defined_type(&node.r#enum, &self.program_path)
			.map(|defined_type| &defined_type.r#type);
		let is_scalar =
			enum_reference_is_scalar(live, node.r#enum.name.as_str(), &self.non_scalar_enums);
		let variant = pascal_case(&node.variant);

		if is_scalar {
			let name = pascal_case(&node.r#enum.name);
			let mut manifest = TypeManifest::with_value(format!("{name}.{variant}"));
			manifest.value_imports.add(&module, name);
			return Ok(manifest);
		}

		let constructor = camel_case(&node.r#enum.name);
		let mut manifest = match &node.value {
			None => TypeManifest::with_value(format!("{constructor}('{variant}')")),
			Some(EnumVariantData::Struct(payload)) => {
				let payload = self.visit_struct_value(payload)?;
				let mut manifest =
					TypeManifest::with_value(format!("{constructor}('{variant}', {})", payload.value));
				manifest.merge_imports([&payload]);
				manifest
			}
			Some(EnumVariantData::Tuple(payload)) => {
				let payload = self.visit_value_list(&payload.items, "[", "]")?;
				let mut manifest =
					TypeManifest::with_value(format!("{constructor}('{variant}', {})", payload.value));
				manifest.merge_imports([&payload]);
				manifest
			}
		};
		manifest.value_imports.add(&module, constructor);
		Ok(manifest)
	}

	/// Constants are the serialized form of a typed value, except raw bytes
	/// which are already in their canonical form.
	fn visit_constant_value(&mut self, node: &ConstantValueNode) -> Result<TypeManifest> {
		if matches!(*node.r#type, TypeNode::Bytes(_)) && matches!(*node.value, ValueNode::Bytes(_)) {
			return self.visit_value(&node.value);
		}

		let r#type = self.visit_child(&node.r#type)?;
		let value = self.visit_value(&node.value)?;
		let serialized = r#type
			.serializer
			.method("serialize", vec![Expr::raw(&value.value)]);

		let mut manifest = TypeManifest::with_value(serialized.render());
		manifest.value_imports.merge(&r#type.serializer_imports);
		manifest.value_imports.merge(&value.value_imports);
		Ok(manifest)
	}
}
