use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Deserialize;

/// Which lookup namespace a name belongs to.
///
/// Artifacts and resources are configured independently: a relationship's
/// artifact patterns never apply to resource lookups and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
	/// Named artifacts, resolved to a single value and memoized.
	Artifact,
	/// Named resources, which may resolve to several values.
	Resource,
}

impl fmt::Display for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Namespace::Artifact => write!(f, "artifact"),
			Namespace::Resource => write!(f, "resource"),
		}
	}
}

/// Identity of an artifact, used for de-duplication.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(Arc<str>);

impl ArtifactId {
	/// Creates an identity from any string.
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	/// The identity as a string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for ArtifactId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.0, f)
	}
}

impl fmt::Display for ArtifactId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ArtifactId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for ArtifactId {
	fn from(id: String) -> Self {
		Self::new(id)
	}
}

/// A resolved artifact handle.
///
/// Cheap to clone. Equality and hashing use only the [`ArtifactId`]; use
/// [`Artifact::ptr_eq`] to check whether two handles are the same instance.
#[derive(Clone)]
pub struct Artifact {
	inner: Arc<ArtifactInner>,
}

struct ArtifactInner {
	id: ArtifactId,
	name: Box<str>,
	provider: Box<str>,
	exported: bool,
}

impl Artifact {
	/// Creates a non-exported artifact named `name`, supplied by `provider`.
	pub fn new(id: impl Into<ArtifactId>, name: &str, provider: &str) -> Self {
		Self::build(id.into(), name, provider, false)
	}

	/// Creates an artifact carrying the exported marker.
	///
	/// Exported artifacts resolve from their provider regardless of the
	/// relationship's isolation level, unless the name is denylisted.
	pub fn exported(id: impl Into<ArtifactId>, name: &str, provider: &str) -> Self {
		Self::build(id.into(), name, provider, true)
	}

	fn build(id: ArtifactId, name: &str, provider: &str, exported: bool) -> Self {
		Self {
			inner: Arc::new(ArtifactInner {
				id,
				name: name.into(),
				provider: provider.into(),
				exported,
			}),
		}
	}

	/// The artifact's identity.
	pub fn id(&self) -> &ArtifactId {
		&self.inner.id
	}

	/// The name the artifact was looked up under.
	pub fn name(&self) -> &str {
		&self.inner.name
	}

	/// Label of the provider that supplied it.
	pub fn provider(&self) -> &str {
		&self.inner.provider
	}

	/// Whether the artifact carries the exported marker.
	pub fn is_exported(&self) -> bool {
		self.inner.exported
	}

	/// Returns `true` if both handles point at the same instance.
	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Arc::ptr_eq(&a.inner, &b.inner)
	}
}

impl PartialEq for Artifact {
	fn eq(&self, other: &Self) -> bool {
		self.inner.id == other.inner.id
	}
}

impl Eq for Artifact {}

impl Hash for Artifact {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.inner.id.hash(state);
	}
}

impl fmt::Debug for Artifact {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Artifact")
			.field("id", &self.inner.id)
			.field("provider", &self.inner.provider)
			.field("exported", &self.inner.exported)
			.finish()
	}
}
