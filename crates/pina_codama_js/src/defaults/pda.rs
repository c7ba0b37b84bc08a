use codama_nodes::ConstantPdaSeedNode;
use codama_nodes::PdaLinkNode;
use codama_nodes::PdaNode;
use codama_nodes::PdaProgramIdValueNode;
use codama_nodes::PdaSeedNode;
use codama_nodes::PdaSeedValueNode;
use codama_nodes::PdaSeedValueValueNode;
use codama_nodes::PdaValue;
use codama_nodes::PdaValueNode;
use codama_nodes::PublicKeyValueNode;
use codama_nodes::TypeNode;
use codama_nodes::ValueNode;
use tracing::warn;

use super::InputDefault;
use super::InstructionDefaultResolver;
use crate::capabilities::Capability;
use crate::error::RenderError;
use crate::error::Result;
use crate::expr::Expr;
use crate::manifest::ParentSize;
use crate::modules::Reference;
use crate::modules::SHARED;
use crate::modules::UMI;
use crate::naming::camel_case;
use crate::naming::pascal_case;
use crate::nodes::resolve_nested;
use crate::nodes::seed_value_as_value;

/// How a seed value is turned into bytes, decided by the seed type.
enum SeedShape {
	PublicKey,
	Bytes,
	Serialized,
}

impl SeedShape {
	fn of(r#type: &TypeNode) -> Self {
		match resolve_nested(r#type) {
			TypeNode::PublicKey(_) => Self::PublicKey,
			TypeNode::Bytes(_) => Self::Bytes,
			_ => Self::Serialized,
		}
	}
}

impl InstructionDefaultResolver<'_, '_> {
	pub(super) fn render_pda(
		&mut self,
		node: &PdaValueNode,
		arg_object: &str,
		output: &mut InputDefault,
	) -> Result<String> {
		output.capabilities.add(Capability::Eddsa);
		let program_id = Self::render_pda_program_id(node, arg_object, output);
		match &node.pda {
			PdaValue::Nested(pda) => {
				self.render_inline_pda(pda, &node.seeds, program_id, arg_object, output)
			}
			PdaValue::Linked(link) => {
				self.render_linked_pda(link, &node.seeds, program_id, arg_object, output)
			}
		}
	}

	/// The program an instruction-level override derives the address from,
	/// read from a sibling account or argument.
	fn render_pda_program_id(
		node: &PdaValueNode,
		arg_object: &str,
		output: &mut InputDefault,
	) -> Option<String> {
		match (*node.program_id).as_ref() {
			None => None,
			Some(PdaProgramIdValueNode::Account(account)) => {
				output.imports.add(SHARED, "expectPublicKey");
				Some(format!(
					"expectPublicKey(resolvedAccounts.{}.value)",
					camel_case(&account.name)
				))
			}
			Some(PdaProgramIdValueNode::Argument(argument)) => {
				output.imports.add(SHARED, "expectSome");
				Some(format!("expectSome({arg_object}.{})", camel_case(&argument.name)))
			}
		}
	}

	fn render_inline_pda(
		&mut self,
		pda: &PdaNode,
		bindings: &[PdaSeedValueNode],
		program_id: Option<String>,
		arg_object: &str,
		output: &mut InputDefault,
	) -> Result<String> {
		let program_id = match (program_id, &pda.program_id) {
			(Some(program_id), _) => program_id,
			(None, Some(program_id)) => {
				let program_id = ValueNode::from(PublicKeyValueNode::new(program_id.as_str()));
				let manifest = self.visitor.visit_value(&program_id)?;
				output.imports.merge(&manifest.value_imports);
				manifest.value
			}
			(None, None) => "programId".to_owned(),
		};

		let mut seeds = Vec::with_capacity(pda.seeds.len());
		for seed in &pda.seeds {
			match seed {
				PdaSeedNode::Constant(seed) => seeds.push(self.render_constant_seed(seed, output)?),
				PdaSeedNode::Variable(seed) => {
					let Some(binding) = bindings.iter().find(|binding| binding.name == seed.name) else {
						warn!(
							pda = pda.name.as_str(),
							seed = seed.name.as_str(),
							"skipping variable seed with no bound value"
						);
						continue;
					};
					let value = self.render_seed_value(&binding.value, arg_object, output)?;
					seeds.push(self.reduce_seed(&seed.r#type, value, output)?);
				}
			}
		}

		Ok(format!(
			"context.eddsa.findPda({program_id}, [{}])",
			seeds.join(", ")
		))
	}

	fn render_constant_seed(
		&mut self,
		seed: &ConstantPdaSeedNode,
		output: &mut InputDefault,
	) -> Result<String> {
		let manifest = self.visitor.visit_value(&seed.value)?;
		output.imports.merge(&manifest.value_imports);
		if matches!(seed.value, ValueNode::Bytes(_)) {
			return Ok(manifest.value);
		}
		self.reduce_seed(&seed.r#type, manifest.value, output)
	}

	/// The expression a bound seed reads its value from. Sibling accounts
	/// and arguments are asserted to be present.
	fn render_seed_value(
		&mut self,
		value: &PdaSeedValueValueNode,
		arg_object: &str,
		output: &mut InputDefault,
	) -> Result<String> {
		match value {
			PdaSeedValueValueNode::Account(account) => {
				output.imports.add(SHARED, "expectPublicKey");
				Ok(format!(
					"expectPublicKey(resolvedAccounts.{}.value)",
					camel_case(&account.name)
				))
			}
			PdaSeedValueValueNode::Argument(argument) => {
				output.imports.add(SHARED, "expectSome");
				Ok(format!("expectSome({arg_object}.{})", camel_case(&argument.name)))
			}
			other => {
				let value = seed_value_as_value(other).ok_or(RenderError::UnsupportedNode {
					kind: "pdaSeedValueNode",
				})?;
				let manifest = self.visitor.visit_value(&value)?;
				output.imports.merge(&manifest.value_imports);
				Ok(manifest.value)
			}
		}
	}

	/// Turn a seed value into bytes according to the seed type.
	fn reduce_seed(
		&mut self,
		r#type: &TypeNode,
		value: String,
		output: &mut InputDefault,
	) -> Result<String> {
		match SeedShape::of(r#type) {
			SeedShape::PublicKey => {
				output.imports.add(UMI, "publicKeyBytes");
				Ok(format!("publicKeyBytes({value})"))
			}
			SeedShape::Bytes => Ok(format!("new Uint8Array({value})")),
			SeedShape::Serialized => {
				let manifest = self
					.visitor
					.with_context(None, Some(ParentSize::Variable), |visitor| {
						visitor.visit_type(r#type)
					})?;
				output.imports.merge(&manifest.serializer_imports);
				Ok(manifest
					.serializer
					.method("serialize", vec![Expr::raw(value)])
					.render())
			}
		}
	}

	fn render_linked_pda(
		&mut self,
		link: &PdaLinkNode,
		bindings: &[PdaSeedValueNode],
		program_id: Option<String>,
		arg_object: &str,
		output: &mut InputDefault,
	) -> Result<String> {
		let function = format!("find{}Pda", pascal_case(&link.name));
		let module = self.visitor.modules().module_for(Reference::Pda(link));
		output.imports.add(&module, &function);

		let mut seeds = Vec::with_capacity(bindings.len());
		for binding in bindings {
			let value = self.render_seed_value(&binding.value, arg_object, output)?;
			seeds.push((camel_case(&binding.name), Expr::raw(value)));
		}

		let program_id = program_id.unwrap_or_else(|| "programId".to_owned());
		let mut args = vec![Expr::raw("context"), Expr::raw(program_id)];
		if !seeds.is_empty() {
			args.push(Expr::Object(seeds));
		}
		Ok(Expr::call(function, args).render())
	}
}
