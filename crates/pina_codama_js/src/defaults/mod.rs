//! Initialization code for instruction inputs the caller does not provide.

mod input;
mod pda;
mod statement;

use codama_nodes::ConditionNode;
use codama_nodes::ConditionalValueNode;
use codama_nodes::HasKind;
use codama_nodes::InstructionInputValueNode;
use codama_nodes::InstructionNode;
use codama_nodes::IsAccountSigner;
use codama_nodes::ResolverValueNode;
use codama_nodes::ValueNode;
use tracing::debug;

pub use self::input::ResolvedInstructionAccount;
pub use self::input::ResolvedInstructionArgument;
pub use self::input::ResolvedInstructionInput;
pub use self::input::resolved_inputs;
pub use self::statement::Statement;
use crate::capabilities::Capability;
use crate::capabilities::CapabilitySet;
use crate::config::OptionalAccountStrategy;
use crate::error::RenderError;
use crate::error::Result;
use crate::imports::ImportMap;
use crate::manifest::TypeManifestVisitor;
use crate::modules::Reference;
use crate::modules::SHARED;
use crate::naming::camel_case;
use crate::naming::pascal_case;

/// The code initializing one input, with what that code needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputDefault {
	pub imports: ImportMap,
	pub capabilities: CapabilitySet,
	/// `None` when nothing needs to run for this input.
	pub statement: Option<Statement>,
}

/// The rendered value of a default rule before it is assigned.
struct RenderedValue {
	value: String,
	is_writable: Option<bool>,
	merge: bool,
}

impl RenderedValue {
	fn new(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			is_writable: None,
			merge: false,
		}
	}

	fn read_only(mut self) -> Self {
		self.is_writable = Some(false);
		self
	}
}

/// Turns the default value rules of instruction inputs into statements.
pub struct InstructionDefaultResolver<'v, 'a> {
	visitor: &'v mut TypeManifestVisitor<'a>,
	optional_account_strategy: OptionalAccountStrategy,
}

impl<'v, 'a> InstructionDefaultResolver<'v, 'a> {
	pub fn new(
		visitor: &'v mut TypeManifestVisitor<'a>,
		optional_account_strategy: OptionalAccountStrategy,
	) -> Self {
		Self {
			visitor,
			optional_account_strategy,
		}
	}

	/// Resolve the default of `input`. Arguments are read from and written to
	/// the object named `arg_object`.
	pub fn resolve(
		&mut self,
		input: &ResolvedInstructionInput,
		arg_object: &str,
	) -> Result<InputDefault> {
		let mut output = InputDefault::default();
		let Some(default_value) = input.default_value() else {
			return Ok(output);
		};

		debug!(input = input.name(), "resolving instruction input default");
		output.statement = self.resolve_value(input, default_value, arg_object, &mut output)?;
		Ok(output)
	}

	fn resolve_value(
		&mut self,
		input: &ResolvedInstructionInput,
		value: &InstructionInputValueNode,
		arg_object: &str,
		output: &mut InputDefault,
	) -> Result<Option<Statement>> {
		let rendered = match value {
			InstructionInputValueNode::Account(account) => {
				let name = camel_case(&account.name);
				let extracts_key = matches!(
					input,
					ResolvedInstructionInput::Account(target)
						if target.resolved_is_signer == IsAccountSigner::True
							&& target.is_signer == IsAccountSigner::False
				);
				let assertion = if extracts_key || matches!(input, ResolvedInstructionInput::Argument(_)) {
					"expectPublicKey"
				} else {
					"expectSome"
				};
				output.imports.add(SHARED, assertion);
				RenderedValue::new(format!("{assertion}(resolvedAccounts.{name}.value)"))
			}
			InstructionInputValueNode::Pda(pda) => {
				RenderedValue::new(self.render_pda(pda, arg_object, output)?)
			}
			InstructionInputValueNode::Identity(_) | InstructionInputValueNode::Payer(_) => {
				return Ok(None);
			}
			InstructionInputValueNode::ProgramId(_) => {
				let omits_optional = matches!(
					input,
					ResolvedInstructionInput::Account(account) if account.is_optional
				) && self.optional_account_strategy == OptionalAccountStrategy::ProgramId;
				if omits_optional {
					return Ok(None);
				}
				RenderedValue::new("programId").read_only()
			}
			InstructionInputValueNode::ProgramLink(program) => {
				let function = format!("get{}ProgramId", pascal_case(&program.name));
				let module = self.visitor.modules().module_for(Reference::Program(program));
				output.imports.add(&module, &function);
				output.capabilities.add(Capability::Programs);
				RenderedValue::new(format!("{function}(context)")).read_only()
			}
			InstructionInputValueNode::AccountBump(account) => {
				output.imports.add(SHARED, "expectPda");
				RenderedValue::new(format!(
					"expectPda(resolvedAccounts.{}.value)[1]",
					camel_case(&account.name)
				))
			}
			InstructionInputValueNode::Argument(argument) => {
				output.imports.add(SHARED, "expectSome");
				RenderedValue::new(format!(
					"expectSome({arg_object}.{})",
					camel_case(&argument.name)
				))
			}
			InstructionInputValueNode::Resolver(resolver) => {
				let call = self.render_resolver_call(resolver, input, arg_object, output);
				RenderedValue {
					merge: matches!(input, ResolvedInstructionInput::Account(_)),
					..RenderedValue::new(call)
				}
			}
			InstructionInputValueNode::Conditional(conditional) => {
				return self.resolve_conditional(input, conditional, arg_object, output);
			}
			literal => {
				let literal = ValueNode::try_from(literal.clone()).map_err(|_| {
					RenderError::UnsupportedNode {
						kind: literal.kind(),
					}
				})?;
				let manifest = self.visitor.visit_value(&literal)?;
				output.imports.merge(&manifest.value_imports);
				RenderedValue::new(manifest.value)
			}
		};

		Ok(Some(assign(input, rendered, arg_object)))
	}

	/// An equality test against the conditional value, or a truthiness test
	/// when there is none.
	fn render_comparison(
		&mut self,
		target: String,
		conditional: &ConditionalValueNode,
		negated: bool,
		output: &mut InputDefault,
	) -> Result<String> {
		let Some(value) = &conditional.value else {
			return Ok(if negated { format!("!{target}") } else { target });
		};

		let manifest = self.visitor.visit_value(value)?;
		output.imports.merge(&manifest.value_imports);
		let operator = if negated { "!==" } else { "===" };
		Ok(format!("{target} {operator} {}", manifest.value))
	}

	fn render_resolver_call(
		&self,
		resolver: &ResolverValueNode,
		input: &ResolvedInstructionInput,
		arg_object: &str,
		output: &mut InputDefault,
	) -> String {
		let function = camel_case(&resolver.name);
		let module = self.visitor.modules().module_for(Reference::Resolver(resolver));
		output.imports.add(&module, &function);
		output.capabilities.add(Capability::Rpc);

		let is_writable = match input {
			ResolvedInstructionInput::Account(account) => account.is_writable,
			ResolvedInstructionInput::Argument(_) => false,
		};
		format!("{function}(context, resolvedAccounts, {arg_object}, programId, {is_writable})")
	}

	fn resolve_conditional(
		&mut self,
		input: &ResolvedInstructionInput,
		conditional: &ConditionalValueNode,
		arg_object: &str,
		output: &mut InputDefault,
	) -> Result<Option<Statement>> {
		let if_true = match (*conditional.if_true).as_ref() {
			Some(value) => self.resolve_value(input, value, arg_object, output)?,
			None => None,
		};
		let if_false = match (*conditional.if_false).as_ref() {
			Some(value) => self.resolve_value(input, value, arg_object, output)?,
			None => None,
		};
		if if_true.is_none() && if_false.is_none() {
			return Ok(None);
		}

		let negated = if_true.is_none();
		let condition = match &conditional.condition {
			ConditionNode::Resolver(resolver) => {
				let call = self.render_resolver_call(resolver, input, arg_object, output);
				if negated { format!("!{call}") } else { call }
			}
			ConditionNode::Account(account) => {
				let target = format!("resolvedAccounts.{}.value", camel_case(&account.name));
				self.render_comparison(target, conditional, negated, output)?
			}
			ConditionNode::Argument(argument) => {
				let target = format!("{arg_object}.{}", camel_case(&argument.name));
				self.render_comparison(target, conditional, negated, output)?
			}
		};

		Ok(Some(match (if_true, if_false) {
			(Some(then), Some(otherwise)) => Statement::if_else(condition, then, otherwise),
			(Some(then), None) | (None, Some(then)) => Statement::if_then(condition, then),
			(None, None) => return Ok(None),
		}))
	}
}

/// Assign a rendered value to the slot of `input`.
fn assign(input: &ResolvedInstructionInput, rendered: RenderedValue, arg_object: &str) -> Statement {
	let name = camel_case(input.name());
	let ResolvedInstructionInput::Account(account) = input else {
		return Statement::assign(format!("{arg_object}.{name}"), rendered.value);
	};

	if rendered.merge {
		return Statement::merge(format!("resolvedAccounts.{name}"), rendered.value);
	}

	let mut statements = vec![Statement::assign(
		format!("resolvedAccounts.{name}.value"),
		rendered.value,
	)];
	if let Some(is_writable) = rendered.is_writable {
		statements.push(Statement::assign(
			format!("resolvedAccounts.{name}.isWritable"),
			is_writable.to_string(),
		));
	}
	if account.is_signer == IsAccountSigner::Either && account.resolved_is_signer == IsAccountSigner::True {
		statements.push(Statement::assign(
			format!("resolvedAccounts.{name}.isSigner"),
			"true",
		));
	}
	Statement::block(statements)
}

/// Every default of an instruction folded together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionDefaults {
	pub imports: ImportMap,
	pub capabilities: CapabilitySet,
	pub statements: Vec<Statement>,
}

impl InstructionDefaults {
	pub fn render_statements(&self) -> String {
		self.statements
			.iter()
			.map(Statement::render)
			.collect::<Vec<_>>()
			.join("\n")
	}
}

/// Resolve the defaults of every input of `instruction`.
///
/// Literal argument defaults are skipped: the instruction data serializer
/// already fills them in.
pub fn resolve_instruction_defaults(
	visitor: &mut TypeManifestVisitor<'_>,
	instruction: &InstructionNode,
	optional_account_strategy: OptionalAccountStrategy,
	arg_object: &str,
) -> Result<InstructionDefaults> {
	debug!(instruction = instruction.name.as_str(), "resolving instruction defaults");
	let mut resolver = InstructionDefaultResolver::new(visitor, optional_account_strategy);
	let mut defaults = InstructionDefaults::default();

	for input in resolved_inputs(instruction) {
		let literal_argument = matches!(
			&input,
			ResolvedInstructionInput::Argument(argument)
				if argument
					.default_value
					.clone()
					.is_some_and(|value| ValueNode::try_from(value).is_ok())
		);
		if literal_argument {
			continue;
		}

		let output = resolver.resolve(&input, arg_object)?;
		defaults.imports.merge(&output.imports);
		defaults.capabilities.merge_with([&output.capabilities]);
		defaults.statements.extend(output.statement);
	}

	Ok(defaults)
}
