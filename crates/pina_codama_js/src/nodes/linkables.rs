use std::collections::BTreeMap;

use codama_nodes::DefinedTypeLinkNode;
use codama_nodes::DefinedTypeNode;
use codama_nodes::ProgramNode;
use codama_nodes::RootNode;

use super::graph::all_programs;

/// Resolves link nodes to the declarations they point at.
///
/// Declarations are keyed by their program so that two programs may declare
/// types with the same name.
#[derive(Debug, Clone, Default)]
pub struct LinkableDictionary {
	defined_types: BTreeMap<(String, String), DefinedTypeNode>,
}

impl LinkableDictionary {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_root(root: &RootNode) -> Self {
		let mut dictionary = Self::new();
		for program in all_programs(root) {
			dictionary.record_program(program);
		}
		dictionary
	}

	pub fn record_program(&mut self, program: &ProgramNode) {
		for defined_type in &program.defined_types {
			self.defined_types.insert(
				(program.name.to_string(), defined_type.name.to_string()),
				defined_type.clone(),
			);
		}
	}

	/// Look up the defined type a link points to.
	///
	/// `path` is the stack of program names currently being traversed. A link
	/// without an explicit program resolves against the innermost program on
	/// the path, or against every program when the path is empty and the name
	/// is unambiguous.
	pub fn defined_type(
		&self,
		link: &DefinedTypeLinkNode,
		path: &[String],
	) -> Option<&DefinedTypeNode> {
		let program = link
			.program
			.as_ref()
			.map(|program| program.name.as_str())
			.or_else(|| path.last().map(String::as_str));

		if let Some(program) = program {
			return self
				.defined_types
				.get(&(program.to_owned(), link.name.to_string()));
		}

		let mut candidates = self
			.defined_types
			.iter()
			.filter(|((_, name), _)| name.as_str() == link.name.as_str())
			.map(|(_, defined_type)| defined_type);
		let first = candidates.next()?;
		candidates.next().is_none().then_some(first)
	}
}
