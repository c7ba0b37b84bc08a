//! A small TypeScript expression tree.
//!
//! Serializers and values are composed as trees and only rendered to text at
//! the edge, so wrappers can inspect and rebuild them structurally.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
	/// Verbatim source text.
	Raw(String),
	/// A single-quoted string literal.
	Str(String),
	Call {
		callee: String,
		generics: Vec<String>,
		args: Vec<Expr>,
	},
	Array(Vec<Expr>),
	Object(Vec<(String, Expr)>),
}

impl Default for Expr {
	fn default() -> Self {
		Self::Raw(String::new())
	}
}

impl Expr {
	pub fn raw(text: impl Into<String>) -> Self {
		Self::Raw(text.into())
	}

	pub fn str(text: impl Into<String>) -> Self {
		Self::Str(text.into())
	}

	pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
		Self::Call {
			callee: callee.into(),
			generics: Vec::new(),
			args,
		}
	}

	pub fn generic_call(callee: impl Into<String>, generics: Vec<String>, args: Vec<Expr>) -> Self {
		Self::Call {
			callee: callee.into(),
			generics,
			args,
		}
	}

	/// A call with an optional trailing options object, dropped when empty.
	pub fn call_with_options(
		callee: impl Into<String>,
		args: Vec<Expr>,
		options: Vec<(String, Expr)>,
	) -> Self {
		Self::generic_call_with_options(callee, Vec::new(), args, options)
	}

	pub fn generic_call_with_options(
		callee: impl Into<String>,
		generics: Vec<String>,
		mut args: Vec<Expr>,
		options: Vec<(String, Expr)>,
	) -> Self {
		if !options.is_empty() {
			args.push(Self::Object(options));
		}
		Self::generic_call(callee, generics, args)
	}

	pub fn object(entries: Vec<(&str, Expr)>) -> Self {
		Self::Object(
			entries
				.into_iter()
				.map(|(key, value)| (key.to_owned(), value))
				.collect(),
		)
	}

	/// Append the method call `.{method}(args)` to this expression.
	#[must_use]
	pub fn method(self, method: &str, args: Vec<Expr>) -> Self {
		Self::call(format!("{self}.{method}"), args)
	}

	pub fn render(&self) -> String {
		self.to_string()
	}
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
	for (index, item) in items.iter().enumerate() {
		if index > 0 {
			f.write_str(", ")?;
		}
		write!(f, "{item}")?;
	}
	Ok(())
}

impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Raw(text) => f.write_str(text),
			Self::Str(text) => {
				let escaped = text.replace('\\', "\\\\").replace('\'', "\\'");
				write!(f, "'{escaped}'")
			}
			Self::Call {
				callee,
				generics,
				args,
			} => {
				f.write_str(callee)?;
				if !generics.is_empty() {
					write!(f, "<{}>", generics.join(", "))?;
				}
				f.write_str("(")?;
				write_list(f, args)?;
				f.write_str(")")
			}
			Self::Array(items) => {
				f.write_str("[")?;
				write_list(f, items)?;
				f.write_str("]")
			}
			Self::Object(entries) if entries.is_empty() => f.write_str("{}"),
			Self::Object(entries) => {
				f.write_str("{ ")?;
				for (index, (key, value)) in entries.iter().enumerate() {
					if index > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{key}: {value}")?;
				}
				f.write_str(" }")
			}
		}
	}
}
