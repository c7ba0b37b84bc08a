use codama_nodes::EnumTypeNode;
use codama_nodes::EnumVariantTypeNode;
use codama_nodes::InstructionNode;
use codama_nodes::PdaSeedValueValueNode;
use codama_nodes::ProgramNode;
use codama_nodes::RootNode;
use codama_nodes::StructFieldTypeNode;
use codama_nodes::StructTypeNode;
use codama_nodes::TypeNode;
use codama_nodes::ValueNode;

/// The main program followed by the additional programs.
pub fn all_programs(root: &RootNode) -> impl Iterator<Item = &ProgramNode> {
	std::iter::once(&root.program).chain(&root.additional_programs)
}

/// Strip size, offset and padding wrappers down to the concrete node.
pub fn resolve_nested(node: &TypeNode) -> &TypeNode {
	match node {
		TypeNode::FixedSize(node) => resolve_nested(&node.r#type),
		TypeNode::SizePrefix(node) => resolve_nested(&node.r#type),
		TypeNode::HiddenPrefix(node) => resolve_nested(&node.r#type),
		TypeNode::HiddenSuffix(node) => resolve_nested(&node.r#type),
		TypeNode::PreOffset(node) => resolve_nested(&node.r#type),
		TypeNode::PostOffset(node) => resolve_nested(&node.r#type),
		TypeNode::Sentinel(node) => resolve_nested(&node.r#type),
		other => other,
	}
}

/// An enum is scalar when none of its variants carry a payload.
pub fn is_scalar_enum(node: &EnumTypeNode) -> bool {
	node.variants
		.iter()
		.all(|variant| matches!(variant, EnumVariantTypeNode::Empty(_)))
}

pub fn variant_name(variant: &EnumVariantTypeNode) -> &str {
	match variant {
		EnumVariantTypeNode::Empty(variant) => variant.name.as_str(),
		EnumVariantTypeNode::Struct(variant) => variant.name.as_str(),
		EnumVariantTypeNode::Tuple(variant) => variant.name.as_str(),
	}
}

/// The struct serialized as the instruction data.
///
/// Only literal argument defaults become serializer defaults; contextual
/// defaults are filled in before serialization.
pub fn instruction_data_struct(instruction: &InstructionNode) -> StructTypeNode {
	let fields = instruction
		.arguments
		.iter()
		.map(|argument| {
			let mut field = StructFieldTypeNode::new(argument.name.clone(), argument.r#type.clone());
			field.docs.clone_from(&argument.docs);
			let literal = argument
				.default_value
				.clone()
				.and_then(|value| ValueNode::try_from(value).ok());
			if let Some(value) = literal {
				field.default_value = Some(value);
				field.default_value_strategy = argument.default_value_strategy;
			}
			field
		})
		.collect();

	StructTypeNode::new(fields)
}

/// The literal value bound to a seed. Account and argument references have
/// none.
pub fn seed_value_as_value(value: &PdaSeedValueValueNode) -> Option<ValueNode> {
	let value = match value.clone() {
		PdaSeedValueValueNode::Account(_) | PdaSeedValueValueNode::Argument(_) => return None,
		PdaSeedValueValueNode::Array(node) => ValueNode::Array(node),
		PdaSeedValueValueNode::Boolean(node) => ValueNode::Boolean(node),
		PdaSeedValueValueNode::Bytes(node) => ValueNode::Bytes(node),
		PdaSeedValueValueNode::Constant(node) => ValueNode::Constant(node),
		PdaSeedValueValueNode::Enum(node) => ValueNode::Enum(node),
		PdaSeedValueValueNode::Map(node) => ValueNode::Map(node),
		PdaSeedValueValueNode::None(node) => ValueNode::None(node),
		PdaSeedValueValueNode::Number(node) => ValueNode::Number(node),
		PdaSeedValueValueNode::PublicKey(node) => ValueNode::PublicKey(node),
		PdaSeedValueValueNode::Set(node) => ValueNode::Set(node),
		PdaSeedValueValueNode::Some(node) => ValueNode::Some(node),
		PdaSeedValueValueNode::String(node) => ValueNode::String(node),
		PdaSeedValueValueNode::Struct(node) => ValueNode::Struct(node),
		PdaSeedValueValueNode::Tuple(node) => ValueNode::Tuple(node),
	};
	Some(value)
}

#[cfg(test)]
mod tests {
	use codama_nodes::AccountValueNode;
	use codama_nodes::DefaultValueStrategy;
	use codama_nodes::EnumEmptyVariantTypeNode;
	use codama_nodes::EnumTupleVariantTypeNode;
	use codama_nodes::FixedSizeTypeNode;
	use codama_nodes::InstructionArgumentNode;
	use codama_nodes::InstructionInputValueNode;
	use codama_nodes::NumberFormat;
	use codama_nodes::NumberTypeNode;
	use codama_nodes::NumberValueNode;
	use codama_nodes::SizePrefixTypeNode;
	use codama_nodes::StringValueNode;
	use codama_nodes::TupleTypeNode;

	use super::*;

	#[test]
	fn resolves_through_size_wrappers() {
		let node: TypeNode = SizePrefixTypeNode::<TypeNode>::new(
			FixedSizeTypeNode::<TypeNode>::new(NumberTypeNode::be(NumberFormat::U16), 2),
			NumberTypeNode::le(NumberFormat::U8),
		)
		.into();

		assert_eq!(resolve_nested(&node), &TypeNode::from(NumberTypeNode::be(NumberFormat::U16)));
	}

	#[test]
	fn scalar_enums_have_no_payload() {
		let scalar = EnumTypeNode::new(vec![
			EnumEmptyVariantTypeNode::new("north").into(),
			EnumEmptyVariantTypeNode::new("south").into(),
		]);
		let data = EnumTypeNode::new(vec![
			EnumEmptyVariantTypeNode::new("idle").into(),
			EnumTupleVariantTypeNode::new(
				"moving",
				TupleTypeNode::new(vec![NumberTypeNode::le(NumberFormat::U8).into()]),
			)
			.into(),
		]);

		assert!(is_scalar_enum(&scalar));
		assert!(!is_scalar_enum(&data));
		assert_eq!(variant_name(&data.variants[1]), "moving");
	}

	#[test]
	fn data_struct_keeps_literal_defaults_only() {
		let mut discriminator =
			InstructionArgumentNode::new("discriminator", NumberTypeNode::le(NumberFormat::U8));
		discriminator.default_value = Some(ValueNode::from(NumberValueNode::new(3u8)).into());
		discriminator.default_value_strategy = Some(DefaultValueStrategy::Omitted);
		let mut owner = InstructionArgumentNode::new("owner", NumberTypeNode::le(NumberFormat::U64));
		owner.default_value = Some(InstructionInputValueNode::Account(AccountValueNode::new("owner")));
		let instruction = InstructionNode {
			name: "transfer".into(),
			arguments: vec![
				InstructionArgumentNode::new("amount", NumberTypeNode::le(NumberFormat::U64)),
				discriminator,
				owner,
			],
			..Default::default()
		};

		let data = instruction_data_struct(&instruction);

		assert_eq!(data.fields.len(), 3);
		assert!(data.fields[0].default_value.is_none());
		assert_eq!(
			data.fields[1].default_value_strategy,
			Some(DefaultValueStrategy::Omitted)
		);
		assert!(data.fields[2].default_value.is_none());
	}

	#[test]
	fn seed_references_have_no_literal_value() {
		let account = PdaSeedValueValueNode::Account(AccountValueNode::new("owner"));
		let string = PdaSeedValueValueNode::from(ValueNode::from(StringValueNode::new("counter")));

		assert_eq!(seed_value_as_value(&account), None);
		assert_eq!(
			seed_value_as_value(&string),
			Some(ValueNode::from(StringValueNode::new("counter")))
		);
	}
}
