use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::RenderError;
use crate::error::Result;
use crate::modules::DefaultModuleResolver;
use crate::modules::ModuleAliases;

/// How optional instruction accounts are represented when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionalAccountStrategy {
	/// Absent accounts are left out of the account metas.
	Omitted,
	/// Absent accounts are replaced by the program id.
	#[default]
	ProgramId,
}

/// Per-name module keys for referenced nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkOverrides {
	pub defined_types: BTreeMap<String, String>,
	pub pdas: BTreeMap<String, String>,
	pub programs: BTreeMap<String, String>,
	pub resolvers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
	/// Extra or replacement module key to import path entries.
	pub dependency_map: BTreeMap<String, String>,
	/// Enums defined outside the rendered IDL that carry data.
	pub non_scalar_enums: Vec<String>,
	pub optional_account_strategy: OptionalAccountStrategy,
	pub link_overrides: LinkOverrides,
	/// The variable holding instruction arguments in generated builders.
	pub arg_object: String,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			dependency_map: BTreeMap::new(),
			non_scalar_enums: Vec::new(),
			optional_account_strategy: OptionalAccountStrategy::default(),
			link_overrides: LinkOverrides::default(),
			arg_object: "args".to_owned(),
		}
	}
}

impl RenderConfig {
	pub fn aliases(&self) -> ModuleAliases {
		ModuleAliases::with_overrides(&self.dependency_map)
	}

	pub fn module_resolver(&self) -> DefaultModuleResolver {
		DefaultModuleResolver::new(self.link_overrides.clone())
	}
}

pub fn read_config(path: &Path) -> Result<RenderConfig> {
	let content = std::fs::read_to_string(path).map_err(|source| {
		RenderError::ReadFile {
			path: path.to_path_buf(),
			source,
		}
	})?;

	serde_json::from_str(&content).map_err(|source| {
		RenderError::ParseConfig {
			path: path.to_path_buf(),
			source,
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_field_is_optional() {
		let config: RenderConfig = serde_json::from_str("{}")
			.unwrap_or_else(|e| panic!("empty config should deserialize: {e}"));

		assert_eq!(config, RenderConfig::default());
		assert_eq!(config.arg_object, "args");
		assert_eq!(config.optional_account_strategy, OptionalAccountStrategy::ProgramId);
	}

	#[test]
	fn reads_camel_case_fields() {
		let json = r#"{
			"dependencyMap": { "hooked": "../custom" },
			"nonScalarEnums": ["tokenStandard"],
			"optionalAccountStrategy": "omitted",
			"linkOverrides": { "pdas": { "metadata": "mplTokenMetadata" } },
			"argObject": "input"
		}"#;
		let config: RenderConfig = serde_json::from_str(json)
			.unwrap_or_else(|e| panic!("config should deserialize: {e}"));

		assert_eq!(config.optional_account_strategy, OptionalAccountStrategy::Omitted);
		assert_eq!(config.non_scalar_enums, vec!["tokenStandard".to_owned()]);
		assert_eq!(config.aliases().path("hooked"), Some("../custom"));
		assert_eq!(
			config.link_overrides.pdas.get("metadata").map(String::as_str),
			Some("mplTokenMetadata")
		);
		assert_eq!(config.arg_object, "input");
	}
}
