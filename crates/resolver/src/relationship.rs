//! Provider relationships.
//!
//! A [`Relationship`] pairs one provider with the policy governing how the
//! resolver uses it: an isolation level plus, per namespace, three pattern
//! sets.
//!
//! - **preferred**: the provider's artifact wins outright.
//! - **denied**: the provider is never asked for the name. Checked first;
//!   beats preferred patterns and the exported marker.
//! - **allowed**: last resort, rescuing a provider artifact that isolation
//!   would otherwise hide.

use std::fmt;
use std::sync::Arc;

use stratum_matcher::{Pattern, PatternSet};

use crate::artifact::Namespace;
use crate::error::Result;
use crate::isolation::IsolationLevel;
use crate::provider::Provider;

/// The three pattern sets applied to one namespace.
#[derive(Clone, Debug, Default)]
pub struct PatternPolicy {
	/// Names taken from the provider whenever it has them.
	pub preferred: PatternSet,
	/// Names the provider is never consulted for.
	pub denied: PatternSet,
	/// Names rescued from the provider when isolation hides them.
	pub allowed: PatternSet,
}

/// A provider plus its isolation policy.
#[derive(Clone)]
pub struct Relationship {
	provider: Arc<dyn Provider>,
	isolation: IsolationLevel,
	artifacts: PatternPolicy,
	resources: PatternPolicy,
}

impl Relationship {
	/// Starts a relationship with `provider`, defaulting to
	/// [`IsolationLevel::None`] and empty pattern sets.
	pub fn builder(provider: Arc<dyn Provider>) -> RelationshipBuilder {
		RelationshipBuilder::new(provider)
	}

	/// The upstream provider.
	pub fn provider(&self) -> &dyn Provider {
		self.provider.as_ref()
	}

	/// The isolation level.
	pub fn isolation(&self) -> IsolationLevel {
		self.isolation
	}

	/// The pattern sets for `namespace`.
	pub fn policy(&self, namespace: Namespace) -> &PatternPolicy {
		match namespace {
			Namespace::Artifact => &self.artifacts,
			Namespace::Resource => &self.resources,
		}
	}
}

impl fmt::Debug for Relationship {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Relationship")
			.field("provider", &self.provider.label())
			.field("isolation", &self.isolation)
			.field("artifacts", &self.artifacts)
			.field("resources", &self.resources)
			.finish()
	}
}

#[derive(Default)]
struct PatternSpecs {
	preferred: Vec<Pattern>,
	denied: Vec<Pattern>,
	allowed: Vec<Pattern>,
}

impl PatternSpecs {
	fn compile(self) -> Result<PatternPolicy> {
		Ok(PatternPolicy {
			preferred: PatternSet::compile(self.preferred)?,
			denied: PatternSet::compile(self.denied)?,
			allowed: PatternSet::compile(self.allowed)?,
		})
	}
}

/// Fluent builder for [`Relationship`].
///
/// Every pattern method accepts a glob string or a
/// [`NamePredicate`](stratum_matcher::NamePredicate). Globs are compiled by
/// [`RelationshipBuilder::build`].
///
/// ```ignore
/// let relationship = Relationship::builder(platform)
///     .isolation(IsolationLevel::Full)
///     .prefer_artifact("log.*")
///     .allow_artifact("core.Public")
///     .deny_resource("META-INF/*")
///     .build()?;
/// ```
pub struct RelationshipBuilder {
	provider: Arc<dyn Provider>,
	isolation: IsolationLevel,
	artifacts: PatternSpecs,
	resources: PatternSpecs,
}

impl RelationshipBuilder {
	/// See [`Relationship::builder`].
	pub fn new(provider: Arc<dyn Provider>) -> Self {
		Self {
			provider,
			isolation: IsolationLevel::default(),
			artifacts: PatternSpecs::default(),
			resources: PatternSpecs::default(),
		}
	}

	/// Sets the isolation level.
	pub fn isolation(mut self, level: IsolationLevel) -> Self {
		self.isolation = level;
		self
	}

	/// Takes artifacts matching `pattern` from the provider when it has them.
	pub fn prefer_artifact(mut self, pattern: impl Into<Pattern>) -> Self {
		self.artifacts.preferred.push(pattern.into());
		self
	}

	/// Never asks the provider for artifacts matching `pattern`, even
	/// exported ones.
	pub fn deny_artifact(mut self, pattern: impl Into<Pattern>) -> Self {
		self.artifacts.denied.push(pattern.into());
		self
	}

	/// Rescues provider artifacts matching `pattern` that isolation would
	/// hide.
	pub fn allow_artifact(mut self, pattern: impl Into<Pattern>) -> Self {
		self.artifacts.allowed.push(pattern.into());
		self
	}

	/// Takes resources matching `pattern` from the provider first.
	pub fn prefer_resource(mut self, pattern: impl Into<Pattern>) -> Self {
		self.resources.preferred.push(pattern.into());
		self
	}

	/// Never asks the provider for resources matching `pattern`.
	pub fn deny_resource(mut self, pattern: impl Into<Pattern>) -> Self {
		self.resources.denied.push(pattern.into());
		self
	}

	/// Rescues provider resources matching `pattern` that isolation would
	/// hide.
	pub fn allow_resource(mut self, pattern: impl Into<Pattern>) -> Self {
		self.resources.allowed.push(pattern.into());
		self
	}

	/// Compiles all patterns.
	///
	/// # Errors
	///
	/// [`ResolveError::InvalidConfiguration`](crate::ResolveError::InvalidConfiguration)
	/// if a glob fails to compile.
	pub fn build(self) -> Result<Relationship> {
		Ok(Relationship {
			provider: self.provider,
			isolation: self.isolation,
			artifacts: self.artifacts.compile()?,
			resources: self.resources.compile()?,
		})
	}
}
