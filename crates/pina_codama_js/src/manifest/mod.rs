//! Type manifests: the strict type, loose type, serializer and value text of a
//! node, each paired with the symbols it needs.

mod type_nodes;
mod value_nodes;

use codama_nodes::AccountNode;
use codama_nodes::DefinedTypeNode;
use codama_nodes::EnumVariantTypeNode;
use codama_nodes::InstructionNode;
use codama_nodes::NestedTypeNode;
use codama_nodes::NumberTypeNode;
use codama_nodes::ProgramNode;
use codama_nodes::StructFieldTypeNode;
use codama_nodes::TypeNode;
use codama_nodes::ValueNode;
use serde::Serialize;
use tracing::debug;

pub use self::value_nodes::enum_reference_is_scalar;
use crate::error::Result;
use crate::expr::Expr;
use crate::imports::ImportMap;
use crate::modules::ModuleAliases;
use crate::modules::ModuleResolver;
use crate::naming::pascal_case;
use crate::nodes::LinkableDictionary;
use crate::nodes::instruction_data_struct;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeManifest {
	/// Set for scalar enums, whose types are rendered as enum bodies.
	pub is_enum: bool,
	pub strict_type: String,
	pub strict_imports: ImportMap,
	pub loose_type: String,
	pub loose_imports: ImportMap,
	pub serializer: Expr,
	pub serializer_imports: ImportMap,
	pub value: String,
	pub value_imports: ImportMap,
}

impl TypeManifest {
	/// A manifest whose strict and loose types are the same text.
	pub(crate) fn with_type(r#type: impl Into<String>) -> Self {
		let r#type = r#type.into();
		Self {
			strict_type: r#type.clone(),
			loose_type: r#type,
			..Self::default()
		}
	}

	pub(crate) fn with_value(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			..Self::default()
		}
	}

	/// Union the imports of `children` into this manifest, per representation.
	pub(crate) fn merge_imports<'m>(&mut self, children: impl IntoIterator<Item = &'m TypeManifest>) {
		for child in children {
			self.strict_imports.merge(&child.strict_imports);
			self.loose_imports.merge(&child.loose_imports);
			self.serializer_imports.merge(&child.serializer_imports);
			self.value_imports.merge(&child.value_imports);
		}
	}

	/// Every import needed by the four representations together.
	pub fn all_imports(&self) -> ImportMap {
		ImportMap::union([
			&self.strict_imports,
			&self.loose_imports,
			&self.serializer_imports,
			&self.value_imports,
		])
	}

	/// A serializable view with every import block rendered through `aliases`.
	pub fn render(&self, aliases: &ModuleAliases) -> Result<RenderedManifest> {
		Ok(RenderedManifest {
			is_enum: self.is_enum,
			strict_type: self.strict_type.clone(),
			strict_imports: self.strict_imports.to_import_statements(aliases)?,
			loose_type: self.loose_type.clone(),
			loose_imports: self.loose_imports.to_import_statements(aliases)?,
			serializer: self.serializer.render(),
			serializer_imports: self.serializer_imports.to_import_statements(aliases)?,
			value: self.value.clone(),
			value_imports: self.value_imports.to_import_statements(aliases)?,
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedManifest {
	pub is_enum: bool,
	pub strict_type: String,
	pub strict_imports: String,
	pub loose_type: String,
	pub loose_imports: String,
	pub serializer: String,
	pub serializer_imports: String,
	pub value: String,
	pub value_imports: String,
}

/// Strict and loose names of the declaration enclosing the visited node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentName {
	pub strict: String,
	pub loose: String,
}

impl ParentName {
	pub fn new(strict: impl Into<String>, loose: impl Into<String>) -> Self {
		Self {
			strict: strict.into(),
			loose: loose.into(),
		}
	}
}

/// A size constraint imposed on a string or bytes node by its wrapper.
#[derive(Debug, Clone, PartialEq)]
pub enum ParentSize {
	Fixed(usize),
	Prefixed(NestedTypeNode<NumberTypeNode>),
	/// No length information at all, as in derived address seeds.
	Variable,
}

/// Any node the manifest visitor can synthesize.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'n> {
	Type(&'n TypeNode),
	Value(&'n ValueNode),
	StructField(&'n StructFieldTypeNode),
	EnumVariant(&'n EnumVariantTypeNode),
	DefinedType(&'n DefinedTypeNode),
	Account(&'n AccountNode),
	Instruction(&'n InstructionNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
	DefinedType,
	Account,
	Instruction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationManifest {
	pub name: String,
	pub kind: DeclarationKind,
	pub manifest: TypeManifest,
}

/// Walks type and value nodes, synthesizing a [`TypeManifest`] for each.
///
/// The enclosing declaration name and size constraint are scoped: every
/// visit that sets them restores the previous values on exit, including
/// when the visit fails.
pub struct TypeManifestVisitor<'a> {
	linkables: &'a LinkableDictionary,
	modules: &'a dyn ModuleResolver,
	non_scalar_enums: Vec<String>,
	parent_name: Option<ParentName>,
	parent_size: Option<ParentSize>,
	program_path: Vec<String>,
}

impl<'a> TypeManifestVisitor<'a> {
	pub fn new(linkables: &'a LinkableDictionary, modules: &'a dyn ModuleResolver) -> Self {
		Self {
			linkables,
			modules,
			non_scalar_enums: Vec::new(),
			parent_name: None,
			parent_size: None,
			program_path: Vec::new(),
		}
	}

	/// Enums living outside the visited graph that carry data.
	#[must_use]
	pub fn with_non_scalar_enums(mut self, non_scalar_enums: Vec<String>) -> Self {
		self.non_scalar_enums = non_scalar_enums;
		self
	}

	pub fn modules(&self) -> &'a dyn ModuleResolver {
		self.modules
	}

	pub fn parent_name(&self) -> Option<&ParentName> {
		self.parent_name.as_ref()
	}

	pub fn parent_size(&self) -> Option<&ParentSize> {
		self.parent_size.as_ref()
	}

	pub fn visit(&mut self, node: NodeRef<'_>) -> Result<TypeManifest> {
		match node {
			NodeRef::Type(node) => self.visit_type(node),
			NodeRef::Value(node) => self.visit_value(node),
			NodeRef::StructField(node) => self.visit_struct_field(node),
			NodeRef::EnumVariant(node) => self.visit_enum_variant(node),
			NodeRef::DefinedType(node) => self.visit_defined_type(node),
			NodeRef::Account(node) => self.visit_account(node),
			NodeRef::Instruction(node) => self.visit_instruction(node),
		}
	}

	pub fn visit_defined_type(&mut self, node: &DefinedTypeNode) -> Result<TypeManifest> {
		debug!(name = node.name.as_str(), "synthesizing defined type manifest");
		let name = pascal_case(&node.name);
		let parent = ParentName::new(&name, format!("{name}Args"));
		self.with_context(Some(parent), None, |visitor| visitor.visit_type(&node.r#type))
	}

	pub fn visit_account(&mut self, node: &AccountNode) -> Result<TypeManifest> {
		debug!(name = node.name.as_str(), "synthesizing account data manifest");
		let name = pascal_case(&node.name);
		let parent = ParentName::new(
			format!("{name}AccountData"),
			format!("{name}AccountDataArgs"),
		);
		let data = TypeNode::from(node.data.clone());
		self.with_context(Some(parent), None, |visitor| visitor.visit_type(&data))
	}

	pub fn visit_instruction(&mut self, node: &InstructionNode) -> Result<TypeManifest> {
		debug!(name = node.name.as_str(), "synthesizing instruction data manifest");
		let name = pascal_case(&node.name);
		let parent = ParentName::new(
			format!("{name}InstructionData"),
			format!("{name}InstructionDataArgs"),
		);
		let data = instruction_data_struct(node);
		self.with_context(Some(parent), None, |visitor| visitor.visit_struct(&data))
	}

	/// Synthesize every declaration of a program, in declaration order:
	/// defined types, then accounts, then instructions.
	pub fn visit_program(&mut self, program: &ProgramNode) -> Result<Vec<DeclarationManifest>> {
		debug!(program = program.name.as_str(), "synthesizing program manifests");
		self.program_path.push(program.name.to_string());
		let result = self.visit_program_declarations(program);
		self.program_path.pop();
		result
	}

	fn visit_program_declarations(&mut self, program: &ProgramNode) -> Result<Vec<DeclarationManifest>> {
		let mut declarations = Vec::new();

		for node in &program.defined_types {
			declarations.push(DeclarationManifest {
				name: node.name.to_string(),
				kind: DeclarationKind::DefinedType,
				manifest: self.visit_defined_type(node)?,
			});
		}
		for node in &program.accounts {
			declarations.push(DeclarationManifest {
				name: node.name.to_string(),
				kind: DeclarationKind::Account,
				manifest: self.visit_account(node)?,
			});
		}
		for node in &program.instructions {
			declarations.push(DeclarationManifest {
				name: node.name.to_string(),
				kind: DeclarationKind::Instruction,
				manifest: self.visit_instruction(node)?,
			});
		}

		Ok(declarations)
	}

	/// Run `visit` inside the program scope `program`.
	pub fn within_program<T>(
		&mut self,
		program: &str,
		visit: impl FnOnce(&mut Self) -> Result<T>,
	) -> Result<T> {
		self.program_path.push(program.to_owned());
		let result = visit(self);
		self.program_path.pop();
		result
	}

	/// Run `visit` with the given enclosing name and size, restoring the
	/// previous ones afterwards.
	pub(crate) fn with_context<T>(
		&mut self,
		parent_name: Option<ParentName>,
		parent_size: Option<ParentSize>,
		visit: impl FnOnce(&mut Self) -> Result<T>,
	) -> Result<T> {
		let previous_name = std::mem::replace(&mut self.parent_name, parent_name);
		let previous_size = std::mem::replace(&mut self.parent_size, parent_size);
		let result = visit(self);
		self.parent_name = previous_name;
		self.parent_size = previous_size;
		result
	}

	/// Visit a child type with no enclosing name or size.
	pub(crate) fn visit_child(&mut self, node: &TypeNode) -> Result<TypeManifest> {
		self.with_context(None, None, |visitor| visitor.visit_type(node))
	}
}
