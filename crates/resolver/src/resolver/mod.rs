//! The resolution engine.
//!
//! # Resolution order
//!
//! For a single artifact:
//!
//! 1. Cached result, if the name was resolved before.
//! 2. The primary relationship.
//! 3. Each fallback relationship, in registration order.
//! 4. [`ResolveError::NotFound`].
//!
//! Resource lists are not short-circuited: every relationship contributes,
//! in order, and the union is de-duplicated by identity.
//!
//! # Invariants
//!
//! - For one resolver and one name, relationship lookups run at most once
//!   per successful resolution, even under concurrent callers (see
//!   [`cache::ResolvedCache`]).
//! - Denylisted names never reach the relationship's provider.
//! - Resolution never mutates provider state; advisories are the only side
//!   effect.

use std::iter;
use std::slice;
use std::sync::Arc;

use indexmap::IndexSet;
use stratum_origin::Location;
use tracing::{debug, trace};

use crate::artifact::{Artifact, Namespace};
use crate::diagnostics::{Advisory, DiagnosticSink};
use crate::error::{ResolveError, Result};
use crate::provider::Provider;
use crate::relationship::Relationship;

mod builder;
mod cache;

pub use builder::ResolverBuilder;
use cache::ResolvedCache;

/// A layered resolver over a local source and ordered relationships.
///
/// Built once by [`ResolverBuilder`] and immutable afterwards. Safe to share
/// across threads; lookups are synchronous and may block inside providers.
pub struct Resolver {
	label: Box<str>,
	locations: Vec<Location>,
	local: Arc<dyn Provider>,
	primary: Relationship,
	fallbacks: Vec<Relationship>,
	resources_enabled: bool,
	sink: Arc<dyn DiagnosticSink>,
	cache: ResolvedCache,
}

impl Resolver {
	/// Starts a new builder.
	pub fn builder() -> ResolverBuilder {
		ResolverBuilder::new()
	}

	/// Resolves the artifact bound to `name`.
	///
	/// Successful results are memoized for the lifetime of the resolver;
	/// failures are not, so a later call retries.
	///
	/// # Errors
	///
	/// [`ResolveError::NotFound`] if no relationship supplies the name.
	pub fn resolve(&self, name: &str) -> Result<Artifact> {
		self.cache
			.get_or_resolve(name, || self.first_hit(name, Namespace::Artifact))
			.ok_or_else(|| {
				debug!(domain = "resolve", resolver = &*self.label, name, "artifact not found");
				ResolveError::NotFound { name: name.to_owned() }
			})
	}

	/// Resolves the first resource bound to `name`.
	///
	/// Uses the resource pattern sets and stops at the first relationship
	/// that supplies the name. Not memoized.
	///
	/// # Errors
	///
	/// [`ResolveError::UnsupportedOperation`] if resource support is
	/// disabled. A missing resource is `Ok(None)`.
	pub fn resolve_resource(&self, name: &str) -> Result<Option<Artifact>> {
		self.ensure_resources("resolve_resource")?;
		Ok(self.first_hit(name, Namespace::Resource))
	}

	/// Resolves every resource bound to `name`, across all relationships.
	///
	/// The result preserves relationship order (primary first) and, within a
	/// relationship, the order produced by its isolation level. Duplicates
	/// are dropped by identity, keeping the first occurrence.
	///
	/// # Errors
	///
	/// [`ResolveError::UnsupportedOperation`] if resource support is
	/// disabled. No matches is an empty list.
	pub fn resolve_all(&self, name: &str) -> Result<Vec<Artifact>> {
		self.ensure_resources("resolve_all")?;
		let mut all = IndexSet::new();
		for relationship in self.relationships() {
			all.extend(self.try_resolve_all(name, relationship));
		}
		Ok(all.into_iter().collect())
	}

	/// Returns the artifact already resolved for `name`, if any.
	pub fn cached(&self, name: &str) -> Option<Artifact> {
		self.cache.get(name)
	}

	/// The validated source locations of the local space.
	pub fn locations(&self) -> &[Location] {
		&self.locations
	}

	/// Whether resource lookups are enabled.
	pub fn supports_resources(&self) -> bool {
		self.resources_enabled
	}

	/// Primary relationship first, then fallbacks in registration order.
	pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
		iter::once(&self.primary).chain(&self.fallbacks)
	}

	fn ensure_resources(&self, operation: &'static str) -> Result<()> {
		if self.resources_enabled {
			Ok(())
		} else {
			Err(ResolveError::UnsupportedOperation { operation })
		}
	}

	fn first_hit(&self, name: &str, namespace: Namespace) -> Option<Artifact> {
		self.relationships()
			.find_map(|relationship| self.try_resolve(name, namespace, relationship))
	}

	/// Applies one relationship's policy to a single-valued lookup.
	fn try_resolve(&self, name: &str, namespace: Namespace, relationship: &Relationship) -> Option<Artifact> {
		let policy = relationship.policy(namespace);
		let provider = relationship.provider();

		let upstream = if policy.denied.matches(name) {
			trace!(domain = "resolve", provider = provider.label(), name, %namespace, "denylisted");
			None
		} else {
			provider.find(name, namespace)
		};

		if let Some(artifact) = &upstream {
			if namespace == Namespace::Artifact && artifact.is_exported() {
				trace!(domain = "resolve", provider = provider.label(), name, "exported");
				return upstream;
			}
			if policy.preferred.matches(name) {
				trace!(domain = "resolve", provider = provider.label(), name, %namespace, "preferred");
				return upstream;
			}
		}

		let local = self.local.find(name, namespace);
		let chosen = relationship.isolation().choose(upstream.clone(), local, |artifact| {
			self.advise(namespace, name, slice::from_ref(artifact));
		});

		if chosen.is_none() && upstream.is_some() && policy.allowed.matches(name) {
			debug!(domain = "resolve", provider = provider.label(), name, %namespace, "allowlisted past isolation");
			return upstream;
		}

		chosen
	}

	/// Applies one relationship's policy to a list-valued resource lookup.
	fn try_resolve_all(&self, name: &str, relationship: &Relationship) -> Vec<Artifact> {
		let policy = relationship.policy(Namespace::Resource);
		let provider = relationship.provider();

		let upstream = if policy.denied.matches(name) {
			trace!(domain = "resolve", provider = provider.label(), name, "resources denylisted");
			Vec::new()
		} else {
			provider.find_all(name)
		};

		let mut resources = IndexSet::new();
		if !upstream.is_empty() && policy.preferred.matches(name) {
			resources.extend(upstream.iter().cloned());
		}

		let local = self.local.find_all(name);
		resources.extend(relationship.isolation().choose_list(upstream.clone(), local, |hidden| {
			self.advise(Namespace::Resource, name, hidden);
		}));

		if policy.allowed.matches(name) {
			resources.extend(upstream);
		}

		resources.into_iter().collect()
	}

	fn advise(&self, namespace: Namespace, name: &str, artifacts: &[Artifact]) {
		self.sink.advisory(&Advisory {
			namespace,
			name: name.to_owned(),
			artifacts: artifacts.iter().map(|a| a.id().clone()).collect(),
		});
	}
}

/// A resolver can serve as another resolver's provider.
///
/// Since resolvers are immutable and a builder only accepts providers that
/// already exist, stacking them can never form a cycle.
impl Provider for Resolver {
	fn label(&self) -> &str {
		&self.label
	}

	fn find(&self, name: &str, namespace: Namespace) -> Option<Artifact> {
		match namespace {
			Namespace::Artifact => self.resolve(name).ok(),
			Namespace::Resource => self.resolve_resource(name).ok().flatten(),
		}
	}

	fn find_all(&self, name: &str) -> Vec<Artifact> {
		self.resolve_all(name).unwrap_or_default()
	}
}

impl std::fmt::Debug for Resolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Resolver")
			.field("label", &self.label)
			.field("locations", &self.locations)
			.field("local", &self.local.label())
			.field("primary", &self.primary)
			.field("fallbacks", &self.fallbacks)
			.field("resources_enabled", &self.resources_enabled)
			.finish_non_exhaustive()
	}
}
