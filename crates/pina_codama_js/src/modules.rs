//! Where generated symbols are imported from.

use std::collections::BTreeMap;

use codama_nodes::DefinedTypeLinkNode;
use codama_nodes::PdaLinkNode;
use codama_nodes::ProgramLinkNode;
use codama_nodes::ResolverValueNode;

use crate::config::LinkOverrides;

pub const UMI: &str = "umi";
pub const UMI_SERIALIZERS: &str = "umiSerializers";
pub const SHARED: &str = "shared";
pub const GENERATED_TYPES: &str = "generatedTypes";
pub const GENERATED_PDAS: &str = "generatedPdas";
pub const GENERATED_PROGRAMS: &str = "generatedPrograms";
pub const HOOKED: &str = "hooked";

/// A node whose generated helpers live in another module.
#[derive(Debug, Clone, Copy)]
pub enum Reference<'a> {
	DefinedType(&'a DefinedTypeLinkNode),
	Pda(&'a PdaLinkNode),
	Program(&'a ProgramLinkNode),
	Resolver(&'a ResolverValueNode),
}

impl Reference<'_> {
	pub fn name(&self) -> &str {
		match self {
			Self::DefinedType(node) => node.name.as_str(),
			Self::Pda(node) => node.name.as_str(),
			Self::Program(node) => node.name.as_str(),
			Self::Resolver(node) => node.name.as_str(),
		}
	}
}

/// Maps a referenced node to the logical module key it is imported from.
pub trait ModuleResolver {
	fn module_for(&self, reference: Reference<'_>) -> String;
}

impl<F> ModuleResolver for F
where
	F: Fn(Reference<'_>) -> String,
{
	fn module_for(&self, reference: Reference<'_>) -> String {
		self(reference)
	}
}

/// Resolves references to the generated client layout, honouring per-name
/// overrides.
#[derive(Debug, Clone, Default)]
pub struct DefaultModuleResolver {
	overrides: LinkOverrides,
}

impl DefaultModuleResolver {
	pub fn new(overrides: LinkOverrides) -> Self {
		Self { overrides }
	}
}

impl ModuleResolver for DefaultModuleResolver {
	fn module_for(&self, reference: Reference<'_>) -> String {
		let (overrides, fallback) = match reference {
			Reference::DefinedType(_) => (&self.overrides.defined_types, GENERATED_TYPES),
			Reference::Pda(_) => (&self.overrides.pdas, GENERATED_PDAS),
			Reference::Program(_) => (&self.overrides.programs, GENERATED_PROGRAMS),
			Reference::Resolver(_) => (&self.overrides.resolvers, HOOKED),
		};

		overrides
			.get(reference.name())
			.cloned()
			.unwrap_or_else(|| fallback.to_owned())
	}
}

/// Module key to import path table used when rendering import statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAliases {
	paths: BTreeMap<String, String>,
}

impl Default for ModuleAliases {
	fn default() -> Self {
		let paths = [
			(UMI, "@metaplex-foundation/umi"),
			(UMI_SERIALIZERS, "@metaplex-foundation/umi/serializers"),
			(SHARED, "../shared"),
			(GENERATED_TYPES, "../types"),
			(GENERATED_PDAS, "../pdas"),
			(GENERATED_PROGRAMS, "../programs"),
			(HOOKED, "../../hooked"),
		]
		.into_iter()
		.map(|(key, path)| (key.to_owned(), path.to_owned()))
		.collect();

		Self { paths }
	}
}

impl ModuleAliases {
	/// The built-in table extended or overridden by `extra`.
	pub fn with_overrides(extra: &BTreeMap<String, String>) -> Self {
		let mut aliases = Self::default();
		aliases
			.paths
			.extend(extra.iter().map(|(key, path)| (key.clone(), path.clone())));
		aliases
	}

	pub fn path(&self, module: &str) -> Option<&str> {
		self.paths.get(module).map(String::as_str)
	}
}
