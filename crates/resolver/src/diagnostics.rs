//! Advisory delivery.
//!
//! The resolver never picks a logging backend. It is handed a
//! [`DiagnosticSink`] at build time and reports advisories to it; the
//! default, [`TracingSink`], forwards them as `tracing` warnings.

use std::fmt;

use crate::artifact::{ArtifactId, Namespace};

/// A name resolved from upstream only, under transitional isolation.
///
/// Everything listed in `artifacts` would be invisible if the relationship
/// ran under full isolation, unless allowlisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Advisory {
	/// Lookup namespace.
	pub namespace: Namespace,
	/// Requested name.
	pub name: String,
	/// Identities of the upstream artifacts involved.
	pub artifacts: Vec<ArtifactId>,
}

impl fmt::Display for Advisory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {:?} used from upstream [", self.namespace, self.name)?;
		for (i, id) in self.artifacts.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{id}")?;
		}
		f.write_str("] would not be visible under full isolation unless allowlisted")
	}
}

/// Receives advisories from a resolver.
pub trait DiagnosticSink: Send + Sync {
	/// Reports one advisory. Must not panic; advisories are never errors.
	fn advisory(&self, advisory: &Advisory);
}

impl<F> DiagnosticSink for F
where
	F: Fn(&Advisory) + Send + Sync,
{
	fn advisory(&self, advisory: &Advisory) {
		self(advisory)
	}
}

/// Forwards advisories to `tracing` at WARN level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn advisory(&self, advisory: &Advisory) {
		tracing::warn!(
			domain = "isolation",
			namespace = %advisory.namespace,
			name = advisory.name.as_str(),
			artifacts = ?advisory.artifacts,
			"{advisory}",
		);
	}
}

/// Discards advisories.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
	fn advisory(&self, _advisory: &Advisory) {}
}
