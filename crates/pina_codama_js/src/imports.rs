//! Symbols required by generated code, grouped by logical module.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::RenderError;
use crate::error::Result;
use crate::modules::ModuleAliases;

/// A multimap from module key to the symbols imported from it.
///
/// Keys and symbols are kept sorted so that rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
	imports: BTreeMap<String, BTreeSet<String>>,
}

impl ImportMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Convenience constructor for a single module.
	pub fn from_symbols<I, S>(module: &str, symbols: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut imports = Self::new();
		imports.add_all(module, symbols);
		imports
	}

	pub fn add(&mut self, module: &str, symbol: impl Into<String>) -> &mut Self {
		self.imports
			.entry(module.to_owned())
			.or_default()
			.insert(symbol.into());
		self
	}

	pub fn add_all<I, S>(&mut self, module: &str, symbols: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let entry = self.imports.entry(module.to_owned()).or_default();
		entry.extend(symbols.into_iter().map(Into::into));
		if entry.is_empty() {
			self.imports.remove(module);
		}
		self
	}

	pub fn remove(&mut self, module: &str, symbol: &str) -> &mut Self {
		self.remove_all(module, [symbol])
	}

	/// Remove symbols from a module. Absent symbols are ignored and a module
	/// left without symbols disappears.
	pub fn remove_all<'s>(
		&mut self,
		module: &str,
		symbols: impl IntoIterator<Item = &'s str>,
	) -> &mut Self {
		if let Some(entry) = self.imports.get_mut(module) {
			for symbol in symbols {
				entry.remove(symbol);
			}
			if entry.is_empty() {
				self.imports.remove(module);
			}
		}
		self
	}

	pub fn merge(&mut self, other: &ImportMap) -> &mut Self {
		for (module, symbols) in &other.imports {
			self.imports
				.entry(module.clone())
				.or_default()
				.extend(symbols.iter().cloned());
		}
		self
	}

	pub fn merge_with<'i>(&mut self, others: impl IntoIterator<Item = &'i ImportMap>) -> &mut Self {
		for other in others {
			self.merge(other);
		}
		self
	}

	/// Build a new map holding the union of every given map.
	pub fn union<'i>(maps: impl IntoIterator<Item = &'i ImportMap>) -> Self {
		let mut imports = Self::new();
		imports.merge_with(maps);
		imports
	}

	pub fn is_empty(&self) -> bool {
		self.imports.is_empty()
	}

	pub fn contains(&self, module: &str, symbol: &str) -> bool {
		self.imports
			.get(module)
			.is_some_and(|symbols| symbols.contains(symbol))
	}

	/// Whether every symbol of `other` is also imported here.
	pub fn is_superset(&self, other: &ImportMap) -> bool {
		other.imports.iter().all(|(module, symbols)| {
			self.imports
				.get(module)
				.is_some_and(|own| own.is_superset(symbols))
		})
	}

	pub fn modules(&self) -> impl Iterator<Item = &str> {
		self.imports.keys().map(String::as_str)
	}

	pub fn symbols(&self, module: &str) -> impl Iterator<Item = &str> {
		self.imports
			.get(module)
			.into_iter()
			.flatten()
			.map(String::as_str)
	}

	/// Render one import declaration per module, resolving each module key
	/// through `aliases`.
	pub fn to_import_statements(&self, aliases: &ModuleAliases) -> Result<String> {
		let mut output = String::new();

		for (module, symbols) in &self.imports {
			let path = aliases
				.path(module)
				.ok_or_else(|| RenderError::UnresolvedModule {
					module: module.clone(),
				})?;
			let symbols = symbols.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
			output.push_str(&format!("import {{ {symbols} }} from '{path}';\n"));
		}

		Ok(output)
	}
}
