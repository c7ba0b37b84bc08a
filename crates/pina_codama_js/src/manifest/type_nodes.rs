use codama_nodes::AmountTypeNode;
use codama_nodes::ArrayTypeNode;
use codama_nodes::BooleanTypeNode;
use codama_nodes::BytesEncoding;
use codama_nodes::CountNode;
use codama_nodes::DateTimeTypeNode;
use codama_nodes::DefaultValueStrategy;
use codama_nodes::DefinedTypeLinkNode;
use codama_nodes::Endian;
use codama_nodes::EnumTypeNode;
use codama_nodes::EnumVariantTypeNode;
use codama_nodes::FixedSizeTypeNode;
use codama_nodes::HasKind;
use codama_nodes::MapTypeNode;
use codama_nodes::NestedTypeNode;
use codama_nodes::NestedTypeNodeTrait;
use codama_nodes::NumberFormat;
use codama_nodes::NumberTypeNode;
use codama_nodes::OptionTypeNode;
use codama_nodes::SetTypeNode;
use codama_nodes::SizePrefixTypeNode;
use codama_nodes::SolAmountTypeNode;
use codama_nodes::StringTypeNode;
use codama_nodes::StructFieldTypeNode;
use codama_nodes::StructTypeNode;
use codama_nodes::TupleTypeNode;
use codama_nodes::TypeNode;
use tracing::trace;

use super::ParentName;
use super::ParentSize;
use super::TypeManifest;
use super::TypeManifestVisitor;
use crate::docs::js_docblock;
use crate::error::RenderError;
use crate::error::Result;
use crate::expr::Expr;
use crate::imports::ImportMap;
use crate::modules::Reference;
use crate::modules::SHARED;
use crate::modules::UMI;
use crate::modules::UMI_SERIALIZERS;
use crate::naming::camel_case;
use crate::naming::is_plain_identifier;
use crate::naming::pascal_case;
use crate::nodes::BytesEncodingExt;
use crate::nodes::NumberFormatExt;
use crate::nodes::is_default_number;
use crate::nodes::is_scalar_enum;
use crate::nodes::variant_name;

/// The visited fields of a struct, before they are composed.
struct StructParts {
	strict_entries: String,
	loose_entries: String,
	serializers: Vec<Expr>,
	imports: TypeManifest,
}

/// Render property entries (each ending in `"; "`) as an object type.
fn object_type(entries: &str) -> String {
	if entries.is_empty() {
		"{}".to_owned()
	} else {
		format!("{{ {entries}}}")
	}
}

fn description_option(parent: Option<&ParentName>) -> Option<(String, Expr)> {
	parent
		.filter(|parent| is_plain_identifier(&parent.strict))
		.map(|parent| ("description".to_owned(), Expr::str(pascal_case(&parent.strict))))
}

fn strict_or_any(parent: Option<&ParentName>) -> String {
	parent.map_or_else(|| "any".to_owned(), |parent| parent.strict.clone())
}

fn loose_or_any(parent: Option<&ParentName>) -> String {
	parent.map_or_else(|| "any".to_owned(), |parent| parent.loose.clone())
}

impl TypeManifestVisitor<'_> {
	pub fn visit_type(&mut self, node: &TypeNode) -> Result<TypeManifest> {
		trace!(kind = node.kind(), "visiting type node");

		match node {
			TypeNode::Number(node) => Ok(Self::visit_number(node)),
			TypeNode::Boolean(node) => self.visit_boolean(node),
			TypeNode::String(node) => self.visit_string(node),
			TypeNode::Bytes(_) => self.visit_bytes(),
			TypeNode::PublicKey(_) => Ok(Self::visit_public_key()),
			TypeNode::Array(node) => self.visit_array(node),
			TypeNode::Set(node) => self.visit_set(node),
			TypeNode::Map(node) => self.visit_map(node),
			TypeNode::Tuple(node) => self.visit_tuple(node),
			TypeNode::Option(node) => self.visit_option(node),
			TypeNode::Struct(node) => self.visit_struct(node),
			TypeNode::Enum(node) => self.visit_enum(node),
			TypeNode::Link(node) => Ok(self.visit_defined_type_link(node)),
			TypeNode::FixedSize(node) => self.visit_fixed_size(node),
			TypeNode::SizePrefix(node) => self.visit_size_prefix(node),
			TypeNode::Amount(node) => self.visit_amount(node),
			TypeNode::DateTime(node) => self.visit_date_time(node),
			TypeNode::SolAmount(node) => self.visit_sol_amount(node),
			TypeNode::HiddenPrefix(_)
			| TypeNode::HiddenSuffix(_)
			| TypeNode::PostOffset(_)
			| TypeNode::PreOffset(_)
			| TypeNode::Sentinel(_)
			| TypeNode::RemainderOption(_)
			| TypeNode::ZeroableOption(_) => {
				Err(RenderError::UnsupportedNode { kind: node.kind() })
			}
		}
	}

	fn visit_number(node: &NumberTypeNode) -> TypeManifest {
		let format = node.format;
		let big_endian = node.endian == Endian::Big && format.has_endianness();
		let mut manifest = if format.is_big() {
			TypeManifest {
				strict_type: "bigint".to_owned(),
				loose_type: "number | bigint".to_owned(),
				..TypeManifest::default()
			}
		} else {
			TypeManifest::with_type("number")
		};

		manifest.serializer = if big_endian && format.is_integer() && !format.is_big() {
			let name = format!("{}Be", format.as_str());
			manifest.serializer_imports.add(SHARED, &name);
			Expr::call(name, vec![])
		} else if big_endian {
			manifest
				.serializer_imports
				.add(UMI_SERIALIZERS, format.as_str())
				.add(UMI_SERIALIZERS, "Endian");
			Expr::call(
				format.as_str(),
				vec![Expr::object(vec![("endian", Expr::raw("Endian.Big"))])],
			)
		} else {
			manifest.serializer_imports.add(UMI_SERIALIZERS, format.as_str());
			Expr::call(format.as_str(), vec![])
		};

		manifest
	}

	/// The serializer manifest of a size or prefix number, unless it is the
	/// `default` format, in which case no option is needed.
	fn visit_size_option(
		&mut self,
		size: &NestedTypeNode<NumberTypeNode>,
		default: NumberFormat,
	) -> Result<Option<TypeManifest>> {
		if is_default_number(size, default) {
			return Ok(None);
		}
		self.visit_child(&TypeNode::from(size.clone())).map(Some)
	}

	fn visit_boolean(&mut self, node: &BooleanTypeNode) -> Result<TypeManifest> {
		let mut manifest = TypeManifest::with_type("boolean");
		let mut options = Vec::new();
		if let Some(size) = self.visit_size_option(&node.size, NumberFormat::U8)? {
			manifest.merge_imports([&size]);
			options.push(("size".to_owned(), size.serializer));
		}
		manifest.serializer_imports.add(UMI_SERIALIZERS, "bool");
		manifest.serializer = Expr::call_with_options("bool", vec![], options);
		Ok(manifest)
	}

	/// The `size` option of a string or bytes serializer, taken from the
	/// enclosing wrapper. `default_prefix` is the prefix that needs no option.
	fn parent_size_option(
		&mut self,
		manifest: &mut TypeManifest,
		default_prefix: Option<NumberFormat>,
	) -> Result<Option<(String, Expr)>> {
		let Some(parent_size) = self.parent_size.clone() else {
			return Ok(None);
		};

		let size = match parent_size {
			ParentSize::Fixed(size) => Expr::raw(size.to_string()),
			ParentSize::Variable => Expr::str("variable"),
			ParentSize::Prefixed(prefix) => {
				if default_prefix.is_some_and(|format| is_default_number(&prefix, format)) {
					return Ok(None);
				}
				let prefix = self.visit_child(&TypeNode::from(prefix))?;
				manifest.merge_imports([&prefix]);
				prefix.serializer
			}
		};

		Ok(Some(("size".to_owned(), size)))
	}

	fn visit_string(&mut self, node: &StringTypeNode) -> Result<TypeManifest> {
		let mut manifest = TypeManifest::with_type("string");
		let mut options = Vec::new();

		if let Some(size) = self.parent_size_option(&mut manifest, Some(NumberFormat::U32))? {
			options.push(size);
		}
		if node.encoding != BytesEncoding::Utf8 {
			let encoding = node.encoding.as_str();
			manifest.serializer_imports.add(UMI_SERIALIZERS, encoding);
			options.push(("encoding".to_owned(), Expr::raw(encoding)));
		}

		manifest.serializer_imports.add(UMI_SERIALIZERS, "string");
		manifest.serializer = Expr::call_with_options("string", vec![], options);
		Ok(manifest)
	}

	fn visit_bytes(&mut self) -> Result<TypeManifest> {
		let mut manifest = TypeManifest::with_type("Uint8Array");
		let options = self
			.parent_size_option(&mut manifest, None)?
			.into_iter()
			.collect();

		manifest.serializer_imports.add(UMI_SERIALIZERS, "bytes");
		manifest.serializer = Expr::call_with_options("bytes", vec![], options);
		Ok(manifest)
	}

	fn visit_public_key() -> TypeManifest {
		let mut manifest = TypeManifest::with_type("PublicKey");
		manifest.strict_imports.add(UMI, "PublicKey");
		manifest.loose_imports.add(UMI, "PublicKey");
		manifest
			.serializer_imports
			.add(UMI_SERIALIZERS, "publicKey as publicKeySerializer");
		manifest.serializer = Expr::call("publicKeySerializer", vec![]);
		manifest
	}

	/// The `size` option of a sequence serializer. The default `u32` prefix
	/// needs no option.
	fn count_option(
		&mut self,
		count: &CountNode,
		manifest: &mut TypeManifest,
	) -> Result<Option<(String, Expr)>> {
		let size = match count {
			CountNode::Fixed(count) => Expr::raw(count.value.to_string()),
			CountNode::Remainder(_) => Expr::str("remainder"),
			CountNode::Prefixed(count) => {
				let Some(prefix) = self.visit_size_option(&count.prefix, NumberFormat::U32)? else {
					return Ok(None);
				};
				manifest.merge_imports([&prefix]);
				prefix.serializer
			}
		};
		Ok(Some(("size".to_owned(), size)))
	}

	/// Shared shape of arrays and sets: `Wrapper<T>` and `serializer(item, opts)`.
	fn visit_sequence(
		&mut self,
		item: &TypeNode,
		count: &CountNode,
		wrapper: &str,
		serializer: &str,
	) -> Result<TypeManifest> {
		let item = self.visit_child(item)?;
		let mut manifest = TypeManifest {
			strict_type: format!("{wrapper}<{}>", item.strict_type),
			loose_type: format!("{wrapper}<{}>", item.loose_type),
			..TypeManifest::default()
		};
		manifest.merge_imports([&item]);

		let options = self.count_option(count, &mut manifest)?.into_iter().collect();
		manifest.serializer_imports.add(UMI_SERIALIZERS, serializer);
		manifest.serializer = Expr::call_with_options(serializer, vec![item.serializer], options);
		Ok(manifest)
	}

	fn visit_array(&mut self, node: &ArrayTypeNode) -> Result<TypeManifest> {
		self.visit_sequence(&node.item, &node.count, "Array", "array")
	}

	fn visit_set(&mut self, node: &SetTypeNode) -> Result<TypeManifest> {
		self.visit_sequence(&node.item, &node.count, "Set", "set")
	}

	fn visit_map(&mut self, node: &MapTypeNode) -> Result<TypeManifest> {
		let key = self.visit_child(&node.key)?;
		let value = self.visit_child(&node.value)?;
		let mut manifest = TypeManifest {
			strict_type: format!("Map<{}, {}>", key.strict_type, value.strict_type),
			loose_type: format!("Map<{}, {}>", key.loose_type, value.loose_type),
			..TypeManifest::default()
		};
		manifest.merge_imports([&key, &value]);

		let options = self
			.count_option(&node.count, &mut manifest)?
			.into_iter()
			.collect();
		manifest.serializer_imports.add(UMI_SERIALIZERS, "map");
		manifest.serializer =
			Expr::call_with_options("map", vec![key.serializer, value.serializer], options);
		Ok(manifest)
	}

	fn visit_tuple(&mut self, node: &TupleTypeNode) -> Result<TypeManifest> {
		let items = node
			.items
			.iter()
			.map(|item| self.visit_child(item))
			.collect::<Result<Vec<_>>>()?;

		let strict = items
			.iter()
			.map(|item| item.strict_type.as_str())
			.collect::<Vec<_>>()
			.join(", ");
		let loose = items
			.iter()
			.map(|item| item.loose_type.as_str())
			.collect::<Vec<_>>()
			.join(", ");
		let mut manifest = TypeManifest {
			strict_type: format!("[{strict}]"),
			loose_type: format!("[{loose}]"),
			..TypeManifest::default()
		};
		manifest.merge_imports(&items);

		manifest.serializer_imports.add(UMI_SERIALIZERS, "tuple");
		manifest.serializer = Expr::call(
			"tuple",
			vec![Expr::Array(
				items.into_iter().map(|item| item.serializer).collect(),
			)],
		);
		Ok(manifest)
	}

	fn visit_option(&mut self, node: &OptionTypeNode) -> Result<TypeManifest> {
		let item = self.visit_child(&node.item)?;
		let mut manifest = TypeManifest {
			strict_type: format!("Option<{}>", item.strict_type),
			loose_type: format!("OptionOrNullable<{}>", item.loose_type),
			..TypeManifest::default()
		};
		manifest.merge_imports([&item]);
		manifest.strict_imports.add(UMI, "Option");
		manifest.loose_imports.add(UMI, "OptionOrNullable");

		let mut options = Vec::new();
		if let Some(prefix) = self.visit_size_option(&node.prefix, NumberFormat::U8)? {
			manifest.merge_imports([&prefix]);
			options.push(("prefix".to_owned(), prefix.serializer));
		}
		if node.fixed {
			options.push(("fixed".to_owned(), Expr::raw("true")));
		}

		manifest.serializer_imports.add(UMI_SERIALIZERS, "option");
		manifest.serializer = Expr::call_with_options("option", vec![item.serializer], options);
		Ok(manifest)
	}

	/// A struct field renders as a `name: Type; ` entry and a
	/// `['name', serializer]` pair.
	pub(crate) fn visit_struct_field(&mut self, node: &StructFieldTypeNode) -> Result<TypeManifest> {
		let name = camel_case(&node.name);
		let mut manifest = self.visit_child(&node.r#type)?;
		let docblock = js_docblock(&node.docs);
		let loose_type = std::mem::take(&mut manifest.loose_type);

		manifest.strict_type = format!("{docblock}{name}: {}; ", manifest.strict_type);
		manifest.serializer = Expr::Array(vec![Expr::str(&name), manifest.serializer]);

		match (&node.default_value, node.default_value_strategy) {
			(None, _) => {
				manifest.loose_type = format!("{docblock}{name}: {loose_type}; ");
			}
			(Some(_), Some(DefaultValueStrategy::Omitted)) => {
				manifest.loose_imports = ImportMap::new();
			}
			(Some(_), _) => {
				manifest.loose_type = format!("{docblock}{name}?: {loose_type}; ");
			}
		}

		Ok(manifest)
	}

	/// Visit the fields of a struct without composing the struct itself.
	fn visit_struct_parts(&mut self, node: &StructTypeNode) -> Result<StructParts> {
		let fields = node
			.fields
			.iter()
			.map(|field| self.with_context(None, None, |visitor| visitor.visit_struct_field(field)))
			.collect::<Result<Vec<_>>>()?;

		let mut imports = TypeManifest::default();
		imports.merge_imports(&fields);

		Ok(StructParts {
			strict_entries: fields.iter().map(|field| field.strict_type.as_str()).collect(),
			loose_entries: fields.iter().map(|field| field.loose_type.as_str()).collect(),
			serializers: fields.into_iter().map(|field| field.serializer).collect(),
			imports,
		})
	}

	pub(crate) fn visit_struct(&mut self, node: &StructTypeNode) -> Result<TypeManifest> {
		let parts = self.visit_struct_parts(node)?;
		self.compose_struct(node, parts)
	}

	fn compose_struct(&mut self, node: &StructTypeNode, parts: StructParts) -> Result<TypeManifest> {
		let parent = self.parent_name.clone();
		let mut manifest = parts.imports;
		manifest.strict_type = object_type(&parts.strict_entries);
		manifest.loose_type = object_type(&parts.loose_entries);

		manifest.serializer_imports.add(UMI_SERIALIZERS, "struct");
		manifest.serializer = Expr::generic_call_with_options(
			"struct",
			vec![strict_or_any(parent.as_ref())],
			vec![Expr::Array(parts.serializers)],
			description_option(parent.as_ref()).into_iter().collect(),
		);

		let defaulted = node
			.fields
			.iter()
			.filter_map(|field| field.default_value.as_ref().map(|value| (field, value)))
			.collect::<Vec<_>>();
		if defaulted.is_empty() {
			return Ok(manifest);
		}

		let mut assignments = Vec::with_capacity(defaulted.len());
		for (field, value) in defaulted {
			let name = camel_case(&field.name);
			let value = self.visit_value(value)?;
			manifest.serializer_imports.merge(&value.value_imports);
			if field.default_value_strategy == Some(DefaultValueStrategy::Omitted) {
				assignments.push(format!("{name}: {}", value.value));
			} else {
				assignments.push(format!("{name}: value.{name} ?? {}", value.value));
			}
		}

		manifest.serializer_imports.add(UMI_SERIALIZERS, "mapSerializer");
		manifest.serializer = Expr::generic_call(
			"mapSerializer",
			vec![
				loose_or_any(parent.as_ref()),
				"any".to_owned(),
				strict_or_any(parent.as_ref()),
			],
			vec![
				manifest.serializer,
				Expr::raw(format!(
					"(value) => ({{ ...value, {} }})",
					assignments.join(", ")
				)),
			],
		);

		Ok(manifest)
	}

	fn visit_enum(&mut self, node: &EnumTypeNode) -> Result<TypeManifest> {
		let parent = self.parent_name.clone();
		let mut manifest = TypeManifest::default();
		let mut options = Vec::new();

		if let Some(size) = self.visit_size_option(&node.size, NumberFormat::U8)? {
			manifest.merge_imports([&size]);
			options.push(("size".to_owned(), size.serializer));
		}

		if is_scalar_enum(node) {
			let variants = node
				.variants
				.iter()
				.map(|variant| pascal_case(variant_name(variant)))
				.collect::<Vec<_>>()
				.join(", ");
			let Some(parent) = parent else {
				return Err(RenderError::InvalidEnumContext { variants });
			};

			options.extend(description_option(Some(&parent)));
			manifest.is_enum = true;
			manifest.strict_type = format!("{{ {variants} }}");
			manifest.loose_type = manifest.strict_type.clone();
			manifest.serializer_imports.add(UMI_SERIALIZERS, "scalarEnum");
			manifest.serializer = Expr::generic_call_with_options(
				"scalarEnum",
				vec![parent.strict.clone()],
				vec![Expr::raw(&parent.strict)],
				options,
			);
			return Ok(manifest);
		}

		let mut strict_arms = Vec::with_capacity(node.variants.len());
		let mut loose_entries = String::new();
		let mut serializers = Vec::with_capacity(node.variants.len());

		for variant in &node.variants {
			let kind = pascal_case(variant_name(variant));
			let variant_parent = parent.as_ref().map(|parent| {
				ParentName::new(
					format!("GetDataEnumKindContent<{}, '{kind}'>", parent.strict),
					format!("GetDataEnumKindContent<{}, '{kind}'>", parent.loose),
				)
			});
			let uses_parent = variant_parent.is_some() && !matches!(variant, EnumVariantTypeNode::Empty(_));
			let variant_manifest = self.with_context(variant_parent, None, |visitor| {
				visitor.visit_enum_variant(variant)
			})?;

			if uses_parent {
				manifest
					.serializer_imports
					.add(UMI_SERIALIZERS, "GetDataEnumKindContent");
			}
			strict_arms.push(variant_manifest.strict_type.clone());
			loose_entries.push_str(&format!("{kind}?: {}; ", variant_manifest.loose_type));
			manifest.merge_imports([&variant_manifest]);
			serializers.push(variant_manifest.serializer);
		}

		manifest.strict_type = strict_arms.join(" | ");
		manifest.loose_type = object_type(&loose_entries);

		options.extend(description_option(parent.as_ref()));
		manifest.serializer_imports.add(UMI_SERIALIZERS, "dataEnum");
		manifest.serializer = Expr::generic_call_with_options(
			"dataEnum",
			vec![strict_or_any(parent.as_ref())],
			vec![Expr::Array(serializers)],
			options,
		);

		Ok(manifest)
	}

	/// A variant renders as a `{ __kind: 'Name'; ... }` arm, its payload shape
	/// as the loose type and a `['Name', serializer]` pair.
	pub(crate) fn visit_enum_variant(&mut self, node: &EnumVariantTypeNode) -> Result<TypeManifest> {
		let kind = pascal_case(variant_name(node));
		let discriminant = format!("__kind: '{kind}'; ");

		let payload = match node {
			EnumVariantTypeNode::Empty(_) => {
				let mut manifest = TypeManifest {
					strict_type: object_type(&discriminant),
					loose_type: "{}".to_owned(),
					..TypeManifest::default()
				};
				manifest.serializer_imports.add(UMI_SERIALIZERS, "unit");
				manifest.serializer =
					Expr::Array(vec![Expr::str(&kind), Expr::call("unit", vec![])]);
				return Ok(manifest);
			}
			EnumVariantTypeNode::Struct(variant) => variant.r#struct.get_nested_type_node().clone(),
			EnumVariantTypeNode::Tuple(variant) => {
				StructTypeNode::new(vec![StructFieldTypeNode::new(
					"fields",
					TypeNode::from(variant.tuple.clone()),
				)])
			}
		};

		let parts = self.visit_struct_parts(&payload)?;
		let strict_type = object_type(&format!("{discriminant}{}", parts.strict_entries));
		let mut manifest = self.compose_struct(&payload, parts)?;
		manifest.strict_type = strict_type;
		manifest.serializer = Expr::Array(vec![Expr::str(&kind), manifest.serializer]);

		Ok(manifest)
	}

	fn visit_defined_type_link(&self, node: &DefinedTypeLinkNode) -> TypeManifest {
		let module = self.modules.module_for(Reference::DefinedType(node));
		let name = pascal_case(&node.name);
		let loose = format!("{name}Args");
		let serializer = format!("get{name}Serializer");

		let mut manifest = TypeManifest {
			strict_type: name.clone(),
			loose_type: loose.clone(),
			serializer: Expr::call(&serializer, vec![]),
			..TypeManifest::default()
		};
		manifest.strict_imports.add(&module, name);
		manifest.loose_imports.add(&module, loose);
		manifest.serializer_imports.add(&module, serializer);
		manifest
	}

	fn visit_fixed_size(&mut self, node: &FixedSizeTypeNode<TypeNode>) -> Result<TypeManifest> {
		let parent = self.parent_name.clone();
		if matches!(*node.r#type, TypeNode::String(_) | TypeNode::Bytes(_)) {
			return self.with_context(parent, Some(ParentSize::Fixed(node.size)), |visitor| {
				visitor.visit_type(&node.r#type)
			});
		}

		let mut manifest = self.with_context(parent, None, |visitor| visitor.visit_type(&node.r#type))?;
		manifest.serializer_imports.add(UMI_SERIALIZERS, "fixSerializer");
		manifest.serializer = Expr::call(
			"fixSerializer",
			vec![manifest.serializer, Expr::raw(node.size.to_string())],
		);
		Ok(manifest)
	}

	fn visit_size_prefix(&mut self, node: &SizePrefixTypeNode<TypeNode>) -> Result<TypeManifest> {
		if !matches!(*node.r#type, TypeNode::String(_) | TypeNode::Bytes(_)) {
			return Err(RenderError::UnsupportedNode {
				kind: "sizePrefixTypeNode",
			});
		}

		let parent = self.parent_name.clone();
		let size = ParentSize::Prefixed((*node.prefix).clone());
		self.with_context(parent, Some(size), |visitor| visitor.visit_type(&node.r#type))
	}

	/// Semantic number wrappers keep the wrapped serializer and only change
	/// the exposed types.
	fn visit_wrapped_number(
		&mut self,
		number: &NestedTypeNode<NumberTypeNode>,
		wrapper: &'static str,
		expected: &'static str,
		accepts: fn(NumberFormat) -> bool,
	) -> Result<TypeManifest> {
		let format = number.get_nested_type_node().format;
		if !accepts(format) {
			return Err(RenderError::FormatMismatch {
				wrapper,
				expected,
				format: format.as_str().to_owned(),
			});
		}

		let number = self.visit_child(&TypeNode::from(number.clone()))?;
		Ok(TypeManifest {
			serializer: number.serializer,
			serializer_imports: number.serializer_imports,
			..TypeManifest::default()
		})
	}

	fn visit_amount(&mut self, node: &AmountTypeNode) -> Result<TypeManifest> {
		let mut manifest = self.visit_wrapped_number(
			&node.number,
			"Amount",
			"unsigned integer",
			NumberFormat::is_unsigned_integer,
		)?;
		let unit = node.unit.as_deref().unwrap_or_default();
		let (type_symbol, r#type) = if unit == "SOL" && node.decimals == 9 {
			("SolAmount", "SolAmount".to_owned())
		} else {
			("Amount", format!("Amount<'{unit}', {}>", node.decimals))
		};

		manifest.strict_type.clone_from(&r#type);
		manifest.loose_type = r#type;
		manifest.strict_imports.add(UMI, type_symbol);
		manifest.loose_imports.add(UMI, type_symbol);
		manifest.serializer_imports.add(UMI, "mapAmountSerializer");
		manifest.serializer = Expr::call(
			"mapAmountSerializer",
			vec![
				manifest.serializer,
				Expr::str(unit),
				Expr::raw(node.decimals.to_string()),
			],
		);
		Ok(manifest)
	}

	fn visit_sol_amount(&mut self, node: &SolAmountTypeNode) -> Result<TypeManifest> {
		let mut manifest = self.visit_wrapped_number(
			&node.number,
			"SolAmount",
			"unsigned integer",
			NumberFormat::is_unsigned_integer,
		)?;

		manifest.strict_type = "SolAmount".to_owned();
		manifest.loose_type = "SolAmount".to_owned();
		manifest.strict_imports.add(UMI, "SolAmount");
		manifest.loose_imports.add(UMI, "SolAmount");
		manifest.serializer_imports.add(UMI, "mapAmountSerializer");
		manifest.serializer = Expr::call(
			"mapAmountSerializer",
			vec![manifest.serializer, Expr::str("SOL"), Expr::raw("9")],
		);
		Ok(manifest)
	}

	fn visit_date_time(&mut self, node: &DateTimeTypeNode) -> Result<TypeManifest> {
		let mut manifest = self.visit_wrapped_number(
			&node.number,
			"DateTime",
			"integer",
			NumberFormat::is_integer,
		)?;

		manifest.strict_type = "DateTime".to_owned();
		manifest.loose_type = "DateTimeInput".to_owned();
		manifest.strict_imports.add(UMI, "DateTime");
		manifest.loose_imports.add(UMI, "DateTimeInput");
		manifest.serializer_imports.add(UMI, "mapDateTimeSerializer");
		manifest.serializer = Expr::call("mapDateTimeSerializer", vec![manifest.serializer]);
		Ok(manifest)
	}
}

#[cfg(test)]
mod tests {
	use codama_nodes::BytesTypeNode;
	use codama_nodes::EnumEmptyVariantTypeNode;
	use codama_nodes::EnumStructVariantTypeNode;
	use codama_nodes::EnumTupleVariantTypeNode;
	use codama_nodes::NumberValueNode;
	use codama_nodes::PublicKeyTypeNode;
	use codama_nodes::PublicKeyValueNode;
	use codama_nodes::RemainderOptionTypeNode;
	use codama_nodes::ValueNode;
	use codama_nodes::ZeroableOptionTypeNode;

	use super::*;
	use crate::modules::DefaultModuleResolver;
	use crate::nodes::LinkableDictionary;

	fn visit(node: impl Into<TypeNode>) -> TypeManifest {
		visit_named(node, None)
	}

	fn visit_named(node: impl Into<TypeNode>, parent: Option<ParentName>) -> TypeManifest {
		try_visit(node, parent).unwrap_or_else(|e| panic!("type should synthesize: {e}"))
	}

	fn try_visit(node: impl Into<TypeNode>, parent: Option<ParentName>) -> Result<TypeManifest> {
		let linkables = LinkableDictionary::new();
		let modules = DefaultModuleResolver::default();
		let mut visitor = TypeManifestVisitor::new(&linkables, &modules);
		let node = node.into();
		visitor.with_context(parent, None, |visitor| visitor.visit_type(&node))
	}

	fn u32_le() -> NumberTypeNode {
		NumberTypeNode::le(NumberFormat::U32)
	}

	fn with_default(
		mut field: StructFieldTypeNode,
		value: impl Into<ValueNode>,
		strategy: Option<DefaultValueStrategy>,
	) -> StructFieldTypeNode {
		field.default_value = Some(value.into());
		field.default_value_strategy = strategy;
		field
	}

	#[test]
	fn little_endian_numbers() {
		let manifest = visit(NumberTypeNode::le(NumberFormat::U16));
		assert_eq!(manifest.strict_type, "number");
		assert_eq!(manifest.serializer.render(), "u16()");
		assert!(manifest.serializer_imports.contains("umiSerializers", "u16"));
	}

	#[test]
	fn big_numbers_accept_bigint() {
		let manifest = visit(NumberTypeNode::le(NumberFormat::U64));
		assert_eq!(manifest.strict_type, "bigint");
		assert_eq!(manifest.loose_type, "number | bigint");
		assert_eq!(manifest.serializer.render(), "u64()");
	}

	#[test]
	fn big_endian_numbers() {
		let small = visit(NumberTypeNode::be(NumberFormat::U16));
		assert_eq!(small.serializer.render(), "u16Be()");
		assert!(small.serializer_imports.contains("shared", "u16Be"));

		let big = visit(NumberTypeNode::be(NumberFormat::I128));
		assert_eq!(big.serializer.render(), "i128({ endian: Endian.Big })");
		assert!(big.serializer_imports.contains("umiSerializers", "Endian"));

		let byte = visit(NumberTypeNode::be(NumberFormat::U8));
		assert_eq!(byte.serializer.render(), "u8()");
	}

	#[test]
	fn booleans_omit_default_size() {
		assert_eq!(visit(BooleanTypeNode::default()).serializer.render(), "bool()");
		assert_eq!(
			visit(BooleanTypeNode::new(NumberTypeNode::le(NumberFormat::U16)))
				.serializer
				.render(),
			"bool({ size: u16() })"
		);
	}

	#[test]
	fn byte_order_of_single_byte_sizes_is_ignored() {
		let boolean = visit(BooleanTypeNode::new(NumberTypeNode::be(NumberFormat::U8)));
		assert_eq!(boolean.serializer.render(), "bool()");
		assert!(!boolean.serializer_imports.contains("umiSerializers", "u8"));

		let option = visit(OptionTypeNode {
			fixed: false,
			item: Box::new(PublicKeyTypeNode::new().into()),
			prefix: NumberTypeNode::be(NumberFormat::U8).into(),
		});
		assert_eq!(option.serializer.render(), "option(publicKeySerializer())");

		let wide = visit(BooleanTypeNode::new(NumberTypeNode::be(NumberFormat::U16)));
		assert_eq!(wide.serializer.render(), "bool({ size: u16Be() })");
	}

	#[test]
	fn string_sizes() {
		assert_eq!(visit(StringTypeNode::utf8()).serializer.render(), "string()");
		assert_eq!(
			visit(FixedSizeTypeNode::<TypeNode>::new(StringTypeNode::utf8(), 32))
				.serializer
				.render(),
			"string({ size: 32 })"
		);
		assert_eq!(
			visit(SizePrefixTypeNode::<TypeNode>::new(StringTypeNode::utf8(), u32_le()))
				.serializer
				.render(),
			"string()"
		);
		assert_eq!(
			visit(SizePrefixTypeNode::<TypeNode>::new(
				StringTypeNode::base58(),
				NumberTypeNode::le(NumberFormat::U8)
			))
			.serializer
			.render(),
			"string({ size: u8(), encoding: base58 })"
		);
	}

	#[test]
	fn bytes_sizes() {
		assert_eq!(visit(BytesTypeNode::new()).serializer.render(), "bytes()");
		assert_eq!(
			visit(FixedSizeTypeNode::<TypeNode>::new(BytesTypeNode::new(), 8))
				.serializer
				.render(),
			"bytes({ size: 8 })"
		);
		assert_eq!(
			visit(SizePrefixTypeNode::<TypeNode>::new(BytesTypeNode::new(), u32_le()))
				.serializer
				.render(),
			"bytes({ size: u32() })"
		);
	}

	#[test]
	fn size_context_does_not_leak_into_siblings() {
		let node = TupleTypeNode::new(vec![
			FixedSizeTypeNode::<TypeNode>::new(StringTypeNode::utf8(), 4).into(),
			StringTypeNode::utf8().into(),
		]);
		let manifest = visit(node);

		assert_eq!(
			manifest.serializer.render(),
			"tuple([string({ size: 4 }), string()])"
		);
		assert_eq!(manifest.strict_type, "[string, string]");
	}

	#[test]
	fn array_counts() {
		let item = || NumberTypeNode::le(NumberFormat::U8);
		let cases = [
			(ArrayTypeNode::prefixed(item(), u32_le()), "array(u8())"),
			(
				ArrayTypeNode::prefixed(item(), NumberTypeNode::le(NumberFormat::U16)),
				"array(u8(), { size: u16() })",
			),
			(ArrayTypeNode::fixed(item(), 3), "array(u8(), { size: 3 })"),
			(ArrayTypeNode::remainder(item()), "array(u8(), { size: 'remainder' })"),
		];

		for (node, expected) in cases {
			let manifest = visit(node);
			assert_eq!(manifest.serializer.render(), expected);
			assert_eq!(manifest.strict_type, "Array<number>");
		}
	}

	#[test]
	fn maps_and_sets() {
		let map = visit(MapTypeNode::prefixed(
			StringTypeNode::utf8(),
			NumberTypeNode::le(NumberFormat::U64),
			u32_le(),
		));
		assert_eq!(map.strict_type, "Map<string, bigint>");
		assert_eq!(map.loose_type, "Map<string, number | bigint>");
		assert_eq!(map.serializer.render(), "map(string(), u64())");

		let set = visit(SetTypeNode::remainder(PublicKeyTypeNode::new()));
		assert_eq!(set.strict_type, "Set<PublicKey>");
		assert_eq!(
			set.serializer.render(),
			"set(publicKeySerializer(), { size: 'remainder' })"
		);
		assert!(set.strict_imports.contains("umi", "PublicKey"));
	}

	#[test]
	fn options() {
		let default = visit(OptionTypeNode::new(PublicKeyTypeNode::new()));
		assert_eq!(default.strict_type, "Option<PublicKey>");
		assert_eq!(default.loose_type, "OptionOrNullable<PublicKey>");
		assert_eq!(default.serializer.render(), "option(publicKeySerializer())");

		let custom = visit(OptionTypeNode {
			fixed: true,
			item: Box::new(u32_le().into()),
			prefix: u32_le().into(),
		});
		assert_eq!(
			custom.serializer.render(),
			"option(u32(), { prefix: u32(), fixed: true })"
		);
	}

	#[test]
	fn two_field_struct() {
		let node = StructTypeNode::new(vec![
			StructFieldTypeNode::new("a", u32_le()),
			StructFieldTypeNode::new("b", StringTypeNode::utf8()),
		]);
		let manifest = visit(node);

		assert_eq!(manifest.strict_type, "{ a: number; b: string; }");
		assert_eq!(manifest.loose_type, "{ a: number; b: string; }");
		assert_eq!(
			manifest.serializer.render(),
			"struct<any>([['a', u32()], ['b', string()]])"
		);
	}

	#[test]
	fn struct_defaults() {
		let node = StructTypeNode::new(vec![
			with_default(
				StructFieldTypeNode::new("discriminator", NumberTypeNode::le(NumberFormat::U8)),
				NumberValueNode::new(1u8),
				Some(DefaultValueStrategy::Omitted),
			),
			with_default(
				StructFieldTypeNode::new("amount", NumberTypeNode::le(NumberFormat::U64)),
				NumberValueNode::new(0u8),
				None,
			),
		]);
		let manifest = visit_named(node, Some(ParentName::new("Transfer", "TransferArgs")));

		assert_eq!(manifest.strict_type, "{ discriminator: number; amount: bigint; }");
		assert_eq!(manifest.loose_type, "{ amount?: number | bigint; }");
		insta::assert_snapshot!(
			manifest.serializer.render(),
			@"mapSerializer<TransferArgs, any, Transfer>(struct<Transfer>([['discriminator', u8()], ['amount', u64()]], { description: 'Transfer' }), (value) => ({ ...value, discriminator: 1, amount: value.amount ?? 0 }))"
		);
	}

	#[test]
	fn omitted_fields_drop_loose_imports() {
		let node = StructTypeNode::new(vec![with_default(
			StructFieldTypeNode::new("authority", PublicKeyTypeNode::new()),
			PublicKeyValueNode::new("11111111111111111111111111111111"),
			Some(DefaultValueStrategy::Omitted),
		)]);
		let manifest = visit(node);

		assert_eq!(manifest.loose_type, "{}");
		assert!(manifest.loose_imports.is_empty());
		assert!(manifest.strict_imports.contains("umi", "PublicKey"));
		assert!(manifest.serializer_imports.contains("umi", "publicKey"));
	}

	#[test]
	fn scalar_enums_need_a_name() {
		let node = EnumTypeNode::new(vec![
			EnumEmptyVariantTypeNode::new("north").into(),
			EnumEmptyVariantTypeNode::new("south").into(),
		]);

		let error = try_visit(node.clone(), None).expect_err("anonymous scalar enum");
		assert!(matches!(error, RenderError::InvalidEnumContext { ref variants } if variants == "North, South"));

		let manifest = visit_named(node, Some(ParentName::new("Direction", "DirectionArgs")));
		assert!(manifest.is_enum);
		assert_eq!(manifest.strict_type, "{ North, South }");
		assert_eq!(
			manifest.serializer.render(),
			"scalarEnum<Direction>(Direction, { description: 'Direction' })"
		);
	}

	#[test]
	fn enum_size_option() {
		let mut node = EnumTypeNode::new(vec![EnumEmptyVariantTypeNode::new("on").into()]);
		node.size = NumberTypeNode::le(NumberFormat::U32).into();
		let manifest = visit_named(node, Some(ParentName::new("Switch", "SwitchArgs")));

		assert_eq!(
			manifest.serializer.render(),
			"scalarEnum<Switch>(Switch, { size: u32(), description: 'Switch' })"
		);
	}

	#[test]
	fn data_enums() {
		let node = EnumTypeNode::new(vec![
			EnumEmptyVariantTypeNode::new("idle").into(),
			EnumStructVariantTypeNode::new(
				"active",
				StructTypeNode::new(vec![StructFieldTypeNode::new(
					"since",
					NumberTypeNode::le(NumberFormat::U64),
				)]),
			)
			.into(),
		]);
		let manifest = visit_named(node, Some(ParentName::new("Status", "StatusArgs")));

		assert!(!manifest.is_enum);
		assert_eq!(
			manifest.strict_type,
			"{ __kind: 'Idle'; } | { __kind: 'Active'; since: bigint; }"
		);
		assert_eq!(
			manifest.loose_type,
			"{ Idle?: {}; Active?: { since: number | bigint; }; }"
		);
		insta::assert_snapshot!(
			manifest.serializer.render(),
			@"dataEnum<Status>([['Idle', unit()], ['Active', struct<GetDataEnumKindContent<Status, 'Active'>>([['since', u64()]])]], { description: 'Status' })"
		);
	}

	#[test]
	fn tuple_variants_become_fields_structs() {
		let node = EnumTypeNode::new(vec![
			EnumTupleVariantTypeNode::new(
				"moving",
				TupleTypeNode::new(vec![u32_le().into(), u32_le().into()]),
			)
			.into(),
		]);
		let manifest = visit(node);

		assert_eq!(manifest.strict_type, "{ __kind: 'Moving'; fields: [number, number]; }");
		assert_eq!(
			manifest.serializer.render(),
			"dataEnum<any>([['Moving', struct<any>([['fields', tuple([u32(), u32()])]])]])"
		);
	}

	#[test]
	fn defined_type_links() {
		let manifest = visit(DefinedTypeLinkNode::new("tokenState"));

		assert_eq!(manifest.strict_type, "TokenState");
		assert_eq!(manifest.loose_type, "TokenStateArgs");
		assert_eq!(manifest.serializer.render(), "getTokenStateSerializer()");
		assert!(manifest.loose_imports.contains("generatedTypes", "TokenStateArgs"));
		assert!(manifest
			.serializer_imports
			.contains("generatedTypes", "getTokenStateSerializer"));
	}

	#[test]
	fn amounts_reuse_the_number_serializer() {
		let node = AmountTypeNode::new(NumberTypeNode::le(NumberFormat::U64), 2, Some("USD".to_owned()));
		let manifest = visit(node);

		assert_eq!(manifest.strict_type, "Amount<'USD', 2>");
		assert_eq!(manifest.serializer.render(), "mapAmountSerializer(u64(), 'USD', 2)");
		assert!(manifest.serializer_imports.contains("umiSerializers", "u64"));

		let sol = visit(SolAmountTypeNode::new(NumberTypeNode::le(NumberFormat::U64)));
		assert_eq!(sol.strict_type, "SolAmount");
		assert_eq!(sol.serializer.render(), "mapAmountSerializer(u64(), 'SOL', 9)");
	}

	#[test]
	fn amounts_reject_signed_numbers() {
		let node = AmountTypeNode::new(NumberTypeNode::le(NumberFormat::I64), 2, None);
		let error = try_visit(node, None).expect_err("signed amount");

		assert!(matches!(error, RenderError::FormatMismatch { ref format, .. } if format == "i64"));
	}

	#[test]
	fn date_times() {
		let manifest = visit(DateTimeTypeNode::new(NumberTypeNode::le(NumberFormat::I64)));
		assert_eq!(manifest.strict_type, "DateTime");
		assert_eq!(manifest.loose_type, "DateTimeInput");
		assert_eq!(manifest.serializer.render(), "mapDateTimeSerializer(i64())");

		let error = try_visit(DateTimeTypeNode::new(NumberTypeNode::le(NumberFormat::F32)), None)
			.expect_err("float date time");
		assert!(matches!(error, RenderError::FormatMismatch { ref format, .. } if format == "f32"));
	}

	#[test]
	fn unsupported_options() {
		let error = try_visit(RemainderOptionTypeNode::new(u32_le()), None).expect_err("remainder option");

		assert!(matches!(
			error,
			RenderError::UnsupportedNode {
				kind: "remainderOptionTypeNode"
			}
		));
	}

	#[test]
	fn fixed_size_non_strings_use_fix_serializer() {
		let manifest = visit(FixedSizeTypeNode::<TypeNode>::new(u32_le(), 8));
		assert_eq!(manifest.serializer.render(), "fixSerializer(u32(), 8)");
	}

	#[test]
	fn parent_context_is_restored_after_failures() {
		let linkables = LinkableDictionary::new();
		let modules = DefaultModuleResolver::default();
		let mut visitor = TypeManifestVisitor::new(&linkables, &modules);
		let failing = TypeNode::from(ZeroableOptionTypeNode::new(u32_le()));

		let result = visitor.with_context(
			Some(ParentName::new("Outer", "OuterArgs")),
			Some(ParentSize::Fixed(4)),
			|visitor| visitor.visit_type(&failing),
		);

		assert!(result.is_err());
		assert!(visitor.parent_name().is_none());
		assert!(visitor.parent_size().is_none());
	}
}
