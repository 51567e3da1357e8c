//! Ordered chains of independent resolvers.

use std::sync::Arc;

use tracing::trace;

use crate::artifact::Artifact;
use crate::error::{ResolveError, Result};
use crate::provider::Provider;
use crate::resolver::Resolver;

/// Tries several already-built resolvers in order.
///
/// Unlike fallback relationships, each member applies its own policies and
/// keeps its own cache; the chain only decides who is asked next.
#[derive(Clone, Debug)]
pub struct ResolverChain {
	members: Vec<Arc<Resolver>>,
}

impl ResolverChain {
	/// Creates a chain from at least one resolver.
	///
	/// # Errors
	///
	/// [`ResolveError::InvalidConfiguration`] if `members` is empty.
	pub fn new(members: impl IntoIterator<Item = Arc<Resolver>>) -> Result<Self> {
		let members: Vec<_> = members.into_iter().collect();
		if members.is_empty() {
			return Err(ResolveError::invalid("a resolver chain needs at least one resolver"));
		}
		Ok(Self { members })
	}

	/// Returns the first member's successful resolution.
	///
	/// # Errors
	///
	/// [`ResolveError::NotFound`] if every member reports it; any other
	/// error stops the chain and is returned as-is.
	pub fn resolve(&self, name: &str) -> Result<Artifact> {
		for member in &self.members {
			match member.resolve(name) {
				Err(e) if e.is_not_found() => {
					trace!(domain = "resolve", resolver = member.label(), name, "not in chain member");
				}
				result => return result,
			}
		}
		Err(ResolveError::NotFound { name: name.to_owned() })
	}

	/// The members, in order.
	pub fn members(&self) -> &[Arc<Resolver>] {
		&self.members
	}
}

#[cfg(test)]
mod tests {
	use stratum_origin::OriginPolicy;

	use super::*;
	use crate::isolation::IsolationLevel;
	use crate::provider::MemoryProvider;
	use crate::relationship::Relationship;

	fn member(label: &str, provider: MemoryProvider, isolation: IsolationLevel) -> Arc<Resolver> {
		let relationship = Relationship::builder(Arc::new(provider))
			.isolation(isolation)
			.build()
			.unwrap();
		Arc::new(
			Resolver::builder()
				.label(label)
				.with_origin_policy(OriginPolicy::allow_by_default())
				.with_primary(relationship)
				.build()
				.unwrap(),
		)
	}

	#[test]
	fn test_first_success_wins() {
		let chain = ResolverChain::new([
			member("strict", MemoryProvider::new("a").with_artifact("x"), IsolationLevel::Full),
			member("open", MemoryProvider::new("b").with_artifact("x").with_artifact("y"), IsolationLevel::None),
			member("late", MemoryProvider::new("c").with_artifact("y"), IsolationLevel::None),
		])
		.unwrap();

		// The strict member hides "x" from its provider, so the next member answers.
		assert_eq!(chain.resolve("x").unwrap().provider(), "b");
		assert_eq!(chain.resolve("y").unwrap().provider(), "b");
		assert!(chain.resolve("z").unwrap_err().is_not_found());
		assert_eq!(chain.members().len(), 3);
	}

	#[test]
	fn test_empty_chain_is_rejected() {
		let err = ResolverChain::new(Vec::new()).unwrap_err();
		assert!(matches!(err, ResolveError::InvalidConfiguration { .. }));
	}
}
