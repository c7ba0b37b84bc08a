use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
	#[error("failed to read `{path}`: {source}")]
	ReadFile {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("failed to parse IDL `{path}` as a Codama root node: {source}")]
	ParseIdl {
		path: PathBuf,
		source: serde_json::Error,
	},
	#[error("failed to parse render config `{path}`: {source}")]
	ParseConfig {
		path: PathBuf,
		source: serde_json::Error,
	},
	/// The graph contains a node kind this renderer has no mapping for.
	#[error("unsupported node `{kind}`: the JavaScript renderer cannot translate it")]
	UnsupportedNode { kind: &'static str },
	/// A semantic number wrapper sits on top of an incompatible number.
	#[error("{wrapper} wrappers can only be applied to {expected} types, got format `{format}`")]
	FormatMismatch {
		wrapper: &'static str,
		expected: &'static str,
		format: String,
	},
	#[error(
		"scalar enum `{{ {variants} }}` cannot be inlined and must be introduced via a defined type"
	)]
	InvalidEnumContext { variants: String },
	#[error("no import path configured for module `{module}`")]
	UnresolvedModule { module: String },
	#[error("invalid {encoding} bytes value `{data}`: {reason}")]
	InvalidBytes {
		encoding: &'static str,
		data: String,
		reason: String,
	},
	#[error("failed to serialize rendered output: {source}")]
	SerializeOutput { source: serde_json::Error },
	#[error("instruction `{name}` does not exist in program `{program}`")]
	UnknownInstruction { program: String, name: String },
}
