//! Rendering core of a Codama JavaScript client generator targeting Umi.
//!
//! Given a Codama node graph this crate synthesizes, per declaration, the
//! TypeScript types, serializer expressions and value literals of a type
//! manifest, and the initialization code for instruction inputs that have a
//! default value. Every fragment carries the imports and runtime capabilities
//! it needs so that the surrounding file generator can assemble them.

pub mod capabilities;
pub mod config;
pub mod defaults;
pub mod docs;
pub mod error;
pub mod expr;
pub mod imports;
pub mod manifest;
pub mod modules;
pub mod naming;
pub mod nodes;

use std::fmt;
use std::path::Path;

use codama_nodes::RootNode;
use serde::Serialize;
use tracing::debug;

pub use crate::capabilities::Capability;
pub use crate::capabilities::CapabilitySet;
pub use crate::config::OptionalAccountStrategy;
pub use crate::config::RenderConfig;
pub use crate::config::read_config;
pub use crate::defaults::InstructionDefaultResolver;
pub use crate::defaults::InstructionDefaults;
pub use crate::defaults::resolve_instruction_defaults;
pub use crate::error::RenderError;
pub use crate::error::Result;
pub use crate::expr::Expr;
pub use crate::imports::ImportMap;
pub use crate::manifest::DeclarationKind;
pub use crate::manifest::RenderedManifest;
pub use crate::manifest::TypeManifest;
pub use crate::manifest::TypeManifestVisitor;
pub use crate::modules::ModuleAliases;
pub use crate::modules::ModuleResolver;
use crate::nodes::LinkableDictionary;
use crate::nodes::all_programs;

/// Read a Codama IDL document from `path`.
pub fn read_root_node(path: &Path) -> Result<RootNode> {
	let content = std::fs::read_to_string(path).map_err(|source| {
		RenderError::ReadFile {
			path: path.to_path_buf(),
			source,
		}
	})?;

	serde_json::from_str(&content).map_err(|source| {
		RenderError::ParseIdl {
			path: path.to_path_buf(),
			source,
		}
	})
}

/// The rendered manifest of one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDeclaration {
	pub program: String,
	pub name: String,
	pub kind: DeclarationKind,
	pub manifest: RenderedManifest,
}

/// Synthesize and render the manifest of every declaration of every program
/// in `root`.
pub fn render_manifests(root: &RootNode, config: &RenderConfig) -> Result<Vec<RenderedDeclaration>> {
	let linkables = LinkableDictionary::from_root(root);
	let resolver = config.module_resolver();
	let aliases = config.aliases();
	let mut visitor = TypeManifestVisitor::new(&linkables, &resolver)
		.with_non_scalar_enums(config.non_scalar_enums.clone());

	let mut rendered = Vec::new();
	for program in all_programs(root) {
		for declaration in visitor.visit_program(program)? {
			rendered.push(RenderedDeclaration {
				program: program.name.to_string(),
				name: declaration.name,
				kind: declaration.kind,
				manifest: declaration.manifest.render(&aliases)?,
			});
		}
	}

	debug!(count = rendered.len(), "rendered declaration manifests");
	Ok(rendered)
}

/// The rendered defaults of one instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDefaults {
	pub imports: String,
	/// `context` when the builder needs a runtime context, empty otherwise.
	pub capabilities: String,
	pub statements: String,
}

impl fmt::Display for RenderedDefaults {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.imports)?;
		if !self.imports.is_empty() {
			writeln!(f)?;
		}
		writeln!(f, "// capabilities: {}", self.capabilities)?;
		if !self.statements.is_empty() {
			writeln!(f, "{}", self.statements)?;
		}
		Ok(())
	}
}

/// Resolve and render the defaults of the instruction named `instruction`.
///
/// The instruction is looked up in the main program first, then in the
/// additional programs.
pub fn render_instruction_defaults(
	root: &RootNode,
	instruction: &str,
	config: &RenderConfig,
) -> Result<RenderedDefaults> {
	let Some((program, node)) = all_programs(root).find_map(|program| {
		program
			.instructions
			.iter()
			.find(|node| node.name.as_str() == instruction)
			.map(|node| (program, node))
	}) else {
		return Err(RenderError::UnknownInstruction {
			program: root.program.name.to_string(),
			name: instruction.to_owned(),
		});
	};

	let linkables = LinkableDictionary::from_root(root);
	let resolver = config.module_resolver();
	let mut visitor = TypeManifestVisitor::new(&linkables, &resolver)
		.with_non_scalar_enums(config.non_scalar_enums.clone());

	let defaults = visitor.within_program(&program.name, |visitor| {
		resolve_instruction_defaults(
			visitor,
			node,
			config.optional_account_strategy,
			&config.arg_object,
		)
	})?;

	Ok(RenderedDefaults {
		imports: defaults.imports.to_import_statements(&config.aliases())?,
		capabilities: defaults.capabilities.summary().to_owned(),
		statements: defaults.render_statements(),
	})
}
