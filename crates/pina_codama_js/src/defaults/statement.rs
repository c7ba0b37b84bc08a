use std::fmt;

const INDENT: &str = "  ";

/// A generated TypeScript statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
	/// `target = value;`
	Assign { target: String, value: String },
	/// `target = { ...target, ...value };`
	Merge { target: String, value: String },
	/// Statements rendered one after the other.
	Block(Vec<Statement>),
	If {
		condition: String,
		then: Box<Statement>,
		otherwise: Option<Box<Statement>>,
	},
}

impl Statement {
	pub fn assign(target: impl Into<String>, value: impl Into<String>) -> Self {
		Self::Assign {
			target: target.into(),
			value: value.into(),
		}
	}

	pub fn merge(target: impl Into<String>, value: impl Into<String>) -> Self {
		Self::Merge {
			target: target.into(),
			value: value.into(),
		}
	}

	pub fn if_then(condition: impl Into<String>, then: Statement) -> Self {
		Self::If {
			condition: condition.into(),
			then: Box::new(then),
			otherwise: None,
		}
	}

	pub fn if_else(condition: impl Into<String>, then: Statement, otherwise: Statement) -> Self {
		Self::If {
			condition: condition.into(),
			then: Box::new(then),
			otherwise: Some(Box::new(otherwise)),
		}
	}

	/// A block, or the statement itself when there is only one.
	pub fn block(mut statements: Vec<Statement>) -> Self {
		if statements.len() == 1 {
			statements.remove(0)
		} else {
			Self::Block(statements)
		}
	}

	pub fn render(&self) -> String {
		self.to_string()
	}

	fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
		let indent = INDENT.repeat(depth);
		match self {
			Self::Assign { target, value } => write!(f, "{indent}{target} = {value};"),
			Self::Merge { target, value } => {
				write!(f, "{indent}{target} = {{ ...{target}, ...{value} }};")
			}
			Self::Block(statements) => {
				for (index, statement) in statements.iter().enumerate() {
					if index > 0 {
						writeln!(f)?;
					}
					statement.write_indented(f, depth)?;
				}
				Ok(())
			}
			Self::If {
				condition,
				then,
				otherwise,
			} => {
				writeln!(f, "{indent}if ({condition}) {{")?;
				then.write_indented(f, depth + 1)?;
				if let Some(otherwise) = otherwise {
					write!(f, "\n{indent}}} else {{\n")?;
					otherwise.write_indented(f, depth + 1)?;
				}
				write!(f, "\n{indent}}}")
			}
		}
	}
}

impl fmt::Display for Statement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.write_indented(f, 0)
	}
}
