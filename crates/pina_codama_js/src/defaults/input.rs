use std::collections::HashMap;

use codama_nodes::AccountValueNode;
use codama_nodes::InstructionInputValueNode;
use codama_nodes::InstructionNode;
use codama_nodes::IsAccountSigner;
use codama_nodes::TypeNode;

/// An instruction account with the signer and optionality it ends up with
/// once its default value is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInstructionAccount {
	pub name: String,
	pub is_writable: bool,
	pub is_signer: IsAccountSigner,
	pub is_optional: bool,
	pub resolved_is_signer: IsAccountSigner,
	pub resolved_is_optional: bool,
	pub default_value: Option<InstructionInputValueNode>,
}

impl ResolvedInstructionAccount {
	pub fn new(name: impl Into<String>, is_writable: bool, is_signer: IsAccountSigner) -> Self {
		Self {
			name: name.into(),
			is_writable,
			is_signer,
			is_optional: false,
			resolved_is_signer: is_signer,
			resolved_is_optional: false,
			default_value: None,
		}
	}

	#[must_use]
	pub fn with_default(mut self, value: impl Into<InstructionInputValueNode>) -> Self {
		self.default_value = Some(value.into());
		self.resolved_is_optional = false;
		self
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInstructionArgument {
	pub name: String,
	pub r#type: TypeNode,
	pub default_value: Option<InstructionInputValueNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedInstructionInput {
	Account(ResolvedInstructionAccount),
	Argument(ResolvedInstructionArgument),
}

impl ResolvedInstructionInput {
	pub fn name(&self) -> &str {
		match self {
			Self::Account(account) => account.name.as_str(),
			Self::Argument(argument) => argument.name.as_str(),
		}
	}

	pub fn default_value(&self) -> Option<&InstructionInputValueNode> {
		match self {
			Self::Account(account) => account.default_value.as_ref(),
			Self::Argument(argument) => argument.default_value.as_ref(),
		}
	}
}

/// Resolve the inputs of an instruction in declaration order, accounts first.
///
/// Accounts defaulting to the identity or the payer become signers, accounts
/// defaulting to a sibling inherit its signer status, and an account with a
/// default is no longer optional unless its sibling is.
pub fn resolved_inputs(instruction: &InstructionNode) -> Vec<ResolvedInstructionInput> {
	let mut resolved = HashMap::<&str, (IsAccountSigner, bool)>::new();
	let mut inputs = Vec::with_capacity(instruction.accounts.len() + instruction.arguments.len());

	for account in &instruction.accounts {
		let (resolved_is_signer, resolved_is_optional) = match &account.default_value {
			None => (account.is_signer, account.is_optional),
			Some(InstructionInputValueNode::Identity(_) | InstructionInputValueNode::Payer(_)) => {
				(IsAccountSigner::True, false)
			}
			Some(InstructionInputValueNode::Account(AccountValueNode { name })) => {
				resolved
					.get(name.as_str())
					.copied()
					.unwrap_or((account.is_signer, false))
			}
			Some(_) => (account.is_signer, false),
		};
		resolved.insert(account.name.as_str(), (resolved_is_signer, resolved_is_optional));

		inputs.push(ResolvedInstructionInput::Account(ResolvedInstructionAccount {
			name: account.name.to_string(),
			is_writable: account.is_writable,
			is_signer: account.is_signer,
			is_optional: account.is_optional,
			resolved_is_signer,
			resolved_is_optional,
			default_value: account.default_value.clone(),
		}));
	}

	for argument in &instruction.arguments {
		inputs.push(ResolvedInstructionInput::Argument(ResolvedInstructionArgument {
			name: argument.name.to_string(),
			r#type: argument.r#type.clone(),
			default_value: argument.default_value.clone(),
		}));
	}

	inputs
}
