//! Runtime capabilities an instruction builder needs from the Umi context.

use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
	Eddsa,
	Identity,
	Payer,
	Programs,
	Rpc,
}

impl Capability {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Eddsa => "eddsa",
			Self::Identity => "identity",
			Self::Payer => "payer",
			Self::Programs => "programs",
			Self::Rpc => "rpc",
		}
	}

	/// Capabilities that can only be served by a live Umi context.
	pub fn requires_runtime(self) -> bool {
		matches!(self, Self::Eddsa | Self::Programs | Self::Rpc)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
	capabilities: BTreeSet<Capability>,
}

impl CapabilitySet {
	pub const CONTEXT: &'static str = "context";

	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, capability: Capability) -> &mut Self {
		self.capabilities.insert(capability);
		self
	}

	pub fn add_all(&mut self, capabilities: impl IntoIterator<Item = Capability>) -> &mut Self {
		self.capabilities.extend(capabilities);
		self
	}

	pub fn remove(&mut self, capability: Capability) -> &mut Self {
		self.capabilities.remove(&capability);
		self
	}

	pub fn merge_with<'c>(&mut self, others: impl IntoIterator<Item = &'c CapabilitySet>) -> &mut Self {
		for other in others {
			self.capabilities.extend(other.capabilities.iter().copied());
		}
		self
	}

	pub fn contains(&self, capability: Capability) -> bool {
		self.capabilities.contains(&capability)
	}

	pub fn is_empty(&self) -> bool {
		self.capabilities.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
		self.capabilities.iter().copied()
	}

	/// Collapse the set into the single parameter the builder signature needs:
	/// `context` when any capability needs the runtime, empty otherwise.
	pub fn summary(&self) -> &'static str {
		if self.capabilities.iter().any(|c| c.requires_runtime()) {
			Self::CONTEXT
		} else {
			""
		}
	}
}

impl FromIterator<Capability> for CapabilitySet {
	fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
		Self {
			capabilities: iter.into_iter().collect(),
		}
	}
}

impl fmt::Display for CapabilitySet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.summary())
	}
}
