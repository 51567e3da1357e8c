//! Declarative resolver configuration.
//!
//! Providers are runtime objects and cannot be described in a file, so a
//! configuration covers everything else and is bound to providers when it is
//! turned into a builder.
//!
//! ```toml
//! label = "plugin"
//! locations = ["file:///opt/plugins/a.bundle"]
//!
//! [origin]
//! default = "deny"
//! filters = [{ kind = "scheme", decision = "allow", schemes = ["file"] }]
//!
//! [primary]
//! isolation = "full"
//! artifacts.preferred = ["core.*"]
//! artifacts.allowed = ["core.Public"]
//!
//! [[fallbacks]]
//! isolation = "transitional"
//! ```

use std::sync::Arc;

use serde::Deserialize;
use stratum_origin::OriginPolicyConfig;

use crate::error::{ResolveError, Result};
use crate::isolation::IsolationLevel;
use crate::provider::Provider;
use crate::relationship::{Relationship, RelationshipBuilder};
use crate::resolver::ResolverBuilder;

/// Glob patterns for one namespace.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PatternConfig {
	/// Names taken from the provider whenever it has them.
	pub preferred: Vec<String>,
	/// Names the provider is never consulted for.
	pub denied: Vec<String>,
	/// Names rescued from the provider when isolation hides them.
	pub allowed: Vec<String>,
}

/// Serializable form of a [`Relationship`], minus its provider.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RelationshipConfig {
	/// Isolation level, `"none"` when omitted.
	pub isolation: IsolationLevel,
	/// Patterns for artifact lookups.
	pub artifacts: PatternConfig,
	/// Patterns for resource lookups.
	pub resources: PatternConfig,
}

impl RelationshipConfig {
	/// Binds the configuration to `provider`.
	///
	/// The returned builder can take further patterns, such as predicates,
	/// before it is built.
	pub fn into_builder(self, provider: Arc<dyn Provider>) -> RelationshipBuilder {
		let mut builder = Relationship::builder(provider).isolation(self.isolation);
		for pattern in self.artifacts.preferred {
			builder = builder.prefer_artifact(pattern);
		}
		for pattern in self.artifacts.denied {
			builder = builder.deny_artifact(pattern);
		}
		for pattern in self.artifacts.allowed {
			builder = builder.allow_artifact(pattern);
		}
		for pattern in self.resources.preferred {
			builder = builder.prefer_resource(pattern);
		}
		for pattern in self.resources.denied {
			builder = builder.deny_resource(pattern);
		}
		for pattern in self.resources.allowed {
			builder = builder.allow_resource(pattern);
		}
		builder
	}

	/// Binds the configuration to `provider` and builds the relationship.
	pub fn build(self, provider: Arc<dyn Provider>) -> Result<Relationship> {
		self.into_builder(provider).build()
	}
}

fn enabled() -> bool {
	true
}

/// Serializable form of a resolver, minus its providers.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
	/// Diagnostic label.
	#[serde(default)]
	pub label: Option<String>,
	/// Origin policy every location is checked against.
	pub origin: OriginPolicyConfig,
	/// Source locations of the local space, as URLs.
	#[serde(default)]
	pub locations: Vec<String>,
	/// The primary relationship.
	pub primary: RelationshipConfig,
	/// Fallback relationships, in lookup order.
	#[serde(default)]
	pub fallbacks: Vec<RelationshipConfig>,
	/// Whether resource lookups are supported.
	#[serde(default = "enabled")]
	pub resources: bool,
}

impl ResolverConfig {
	/// Binds the configuration to its providers.
	///
	/// `fallbacks` must yield exactly one provider per configured fallback,
	/// in order. The local source and diagnostics are left at their defaults
	/// for the caller to set.
	///
	/// # Errors
	///
	/// [`ResolveError::InvalidConfiguration`] if the provider count does not
	/// match, a glob does not compile, or the origin policy is invalid.
	pub fn into_builder(
		self,
		primary: Arc<dyn Provider>,
		fallbacks: impl IntoIterator<Item = Arc<dyn Provider>>,
	) -> Result<ResolverBuilder> {
		let fallbacks: Vec<_> = fallbacks.into_iter().collect();
		if fallbacks.len() != self.fallbacks.len() {
			return Err(ResolveError::invalid(format!(
				"{} fallback relationships configured but {} providers given",
				self.fallbacks.len(),
				fallbacks.len()
			)));
		}

		let mut builder = ResolverBuilder::new()
			.with_origin_policy(self.origin.build()?)
			.with_primary(self.primary.build(primary)?)
			.with_resource_support(self.resources);
		if let Some(label) = &self.label {
			builder = builder.label(label);
		}
		for location in &self.locations {
			builder = builder.with_location_str(location);
		}
		for (config, provider) in self.fallbacks.into_iter().zip(fallbacks) {
			builder = builder.add_fallback(config.build(provider)?);
		}
		Ok(builder)
	}
}
