//! The provider contract.
//!
//! A provider answers "do you supply the artifact named N" for the resolver.
//! How it gets the bytes behind the answer (local files, network, an
//! embedded table) is its own business; the resolver only sees handles.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use stratum_matcher::NamePredicate;

use crate::artifact::{Artifact, ArtifactId, Namespace};

/// Anything that can answer name lookups.
///
/// Implementations may block (e.g. on I/O). The resolver never holds a lock
/// other than the per-name resolution lock while calling into a provider.
pub trait Provider: Send + Sync {
	/// Short label used in diagnostics.
	fn label(&self) -> &str {
		std::any::type_name::<Self>()
	}

	/// Looks up the single artifact bound to `name` in `namespace`.
	fn find(&self, name: &str, namespace: Namespace) -> Option<Artifact>;

	/// Enumerates every resource bound to `name`, in provider order.
	///
	/// Defaults to the single resource lookup.
	fn find_all(&self, name: &str) -> Vec<Artifact> {
		self.find(name, Namespace::Resource).into_iter().collect()
	}
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
	fn label(&self) -> &str {
		(**self).label()
	}

	fn find(&self, name: &str, namespace: Namespace) -> Option<Artifact> {
		(**self).find(name, namespace)
	}

	fn find_all(&self, name: &str) -> Vec<Artifact> {
		(**self).find_all(name)
	}
}

/// A provider that supplies nothing.
///
/// Used as the local source of resolvers built without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyProvider;

impl Provider for EmptyProvider {
	fn label(&self) -> &str {
		"empty"
	}

	fn find(&self, _name: &str, _namespace: Namespace) -> Option<Artifact> {
		None
	}

	fn find_all(&self, _name: &str) -> Vec<Artifact> {
		Vec::new()
	}
}

/// An in-memory provider backed by name tables.
///
/// Artifact identities default to `"{label}:{name}"`.
#[derive(Clone, Debug)]
pub struct MemoryProvider {
	label: Box<str>,
	artifacts: FxHashMap<Box<str>, Artifact>,
	resources: FxHashMap<Box<str>, Vec<Artifact>>,
}

impl MemoryProvider {
	/// Creates an empty provider.
	pub fn new(label: &str) -> Self {
		Self {
			label: label.into(),
			artifacts: FxHashMap::default(),
			resources: FxHashMap::default(),
		}
	}

	/// Adds a non-exported artifact named `name`.
	pub fn with_artifact(mut self, name: &str) -> Self {
		let artifact = Artifact::new(self.default_id(name), name, &self.label);
		self.insert_artifact(artifact);
		self
	}

	/// Adds an artifact named `name` carrying the exported marker.
	pub fn with_exported(mut self, name: &str) -> Self {
		let artifact = Artifact::exported(self.default_id(name), name, &self.label);
		self.insert_artifact(artifact);
		self
	}

	/// Adds a resource bound to `name` with identity `id`.
	///
	/// Several resources may share a name; they are returned in insertion
	/// order.
	pub fn with_resource(mut self, name: &str, id: impl Into<ArtifactId>) -> Self {
		let resource = Artifact::new(id, name, &self.label);
		self.resources.entry(name.into()).or_default().push(resource);
		self
	}

	/// Inserts (or replaces) the artifact bound to its own name.
	pub fn insert_artifact(&mut self, artifact: Artifact) {
		self.artifacts.insert(artifact.name().into(), artifact);
	}

	fn default_id(&self, name: &str) -> ArtifactId {
		ArtifactId::new(format!("{}:{name}", self.label))
	}
}

impl Provider for MemoryProvider {
	fn label(&self) -> &str {
		&self.label
	}

	fn find(&self, name: &str, namespace: Namespace) -> Option<Artifact> {
		match namespace {
			Namespace::Artifact => self.artifacts.get(name).cloned(),
			Namespace::Resource => self.resources.get(name).and_then(|r| r.first()).cloned(),
		}
	}

	fn find_all(&self, name: &str) -> Vec<Artifact> {
		self.resources.get(name).cloned().unwrap_or_default()
	}
}

/// A predicate matching every name `provider` supplies in `namespace`.
///
/// Typically added as a preferred pattern, so that anything a base provider
/// knows is always taken from it. Note that evaluating the predicate calls
/// into the provider.
pub fn provided_by(provider: Arc<dyn Provider>, namespace: Namespace) -> NamePredicate {
	NamePredicate::from_fn(move |name| provider.find(name, namespace).is_some())
}
