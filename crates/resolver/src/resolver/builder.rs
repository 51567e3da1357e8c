use std::fmt;
use std::sync::Arc;

use stratum_origin::{Location, OriginPolicy};
use tracing::{debug, warn};

use super::Resolver;
use super::cache::ResolvedCache;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{ResolveError, Result};
use crate::provider::{EmptyProvider, Provider};
use crate::relationship::Relationship;

type LocalFactory = Box<dyn FnOnce(&[Location]) -> Result<Arc<dyn Provider>>>;

enum LocalSource {
	Provider(Arc<dyn Provider>),
	Factory(LocalFactory),
}

/// Collects resolver settings and validates them in [`ResolverBuilder::build`].
///
/// Nothing is checked until `build`. Unparseable location strings are kept
/// and reported there, so the fluent chain never has to stop for a `?`.
///
/// ```ignore
/// let resolver = Resolver::builder()
///     .label("plugin")
///     .with_origin_policy(OriginPolicy::deny_by_default().allowing_schemes(["file"]))
///     .with_location_str("file:///opt/plugins/a.bundle")
///     .with_primary(platform)
///     .with_local_source(bundle)
///     .build()?;
/// ```
pub struct ResolverBuilder {
	label: Box<str>,
	origin_policy: Option<Arc<OriginPolicy>>,
	locations: Vec<stratum_origin::Result<Location>>,
	primary: Option<Relationship>,
	fallbacks: Vec<Relationship>,
	local: LocalSource,
	sink: Arc<dyn DiagnosticSink>,
	resources_enabled: bool,
}

impl fmt::Debug for ResolverBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let local = match &self.local {
			LocalSource::Provider(provider) => provider.label(),
			LocalSource::Factory(_) => "<factory>",
		};
		f.debug_struct("ResolverBuilder")
			.field("label", &self.label)
			.field("origin_policy", &self.origin_policy)
			.field("locations", &self.locations)
			.field("primary", &self.primary)
			.field("fallbacks", &self.fallbacks)
			.field("local", &local)
			.field("resources_enabled", &self.resources_enabled)
			.finish_non_exhaustive()
	}
}

impl Default for ResolverBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ResolverBuilder {
	/// A builder with no policy, no relationships, an empty local source,
	/// resource support on and advisories routed to [`TracingSink`].
	pub fn new() -> Self {
		Self {
			label: "resolver".into(),
			origin_policy: None,
			locations: Vec::new(),
			primary: None,
			fallbacks: Vec::new(),
			local: LocalSource::Provider(Arc::new(EmptyProvider)),
			sink: Arc::new(TracingSink),
			resources_enabled: true,
		}
	}

	/// Label used in diagnostics and when the resolver acts as a provider.
	pub fn label(mut self, label: &str) -> Self {
		self.label = label.into();
		self
	}

	/// Sets the origin policy every location is checked against.
	///
	/// Required. Policies are immutable and may be shared between builders.
	pub fn with_origin_policy(mut self, policy: impl Into<Arc<OriginPolicy>>) -> Self {
		self.origin_policy = Some(policy.into());
		self
	}

	/// Adds a source location of the local space.
	pub fn with_location(mut self, location: Location) -> Self {
		self.locations.push(Ok(location));
		self
	}

	/// Adds several source locations.
	pub fn with_locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
		self.locations.extend(locations.into_iter().map(Ok));
		self
	}

	/// Adds a source location given as a URL string. Parse errors surface
	/// from [`ResolverBuilder::build`].
	pub fn with_location_str(mut self, location: &str) -> Self {
		self.locations.push(Location::parse(location));
		self
	}

	/// Sets the primary relationship. Required.
	pub fn with_primary(mut self, relationship: Relationship) -> Self {
		self.primary = Some(relationship);
		self
	}

	/// Appends a fallback relationship, consulted after the primary and any
	/// earlier fallbacks.
	pub fn add_fallback(mut self, relationship: Relationship) -> Self {
		self.fallbacks.push(relationship);
		self
	}

	/// Uses `provider` as the local space.
	pub fn with_local_source(mut self, provider: Arc<dyn Provider>) -> Self {
		self.local = LocalSource::Provider(provider);
		self
	}

	/// Opens the local space from the validated locations.
	///
	/// `open` runs inside [`ResolverBuilder::build`], only after every
	/// location passed the origin policy, so it never touches a rejected one.
	pub fn with_local_source_factory<F>(mut self, open: F) -> Self
	where
		F: FnOnce(&[Location]) -> Result<Arc<dyn Provider>> + 'static,
	{
		self.local = LocalSource::Factory(Box::new(open));
		self
	}

	/// Routes advisories to `sink` instead of [`TracingSink`].
	pub fn with_diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
		self.sink = Arc::new(sink);
		self
	}

	/// Enables or disables resource lookups. When disabled, every resource
	/// call fails with [`ResolveError::UnsupportedOperation`].
	pub fn with_resource_support(mut self, enabled: bool) -> Self {
		self.resources_enabled = enabled;
		self
	}

	/// Shorthand for `with_resource_support(false)`.
	pub fn without_resources(self) -> Self {
		self.with_resource_support(false)
	}

	/// Validates the configuration and builds the resolver.
	///
	/// Checks run in order: origin policy present, every location parsed and
	/// allowed, primary relationship present. The local source is opened last.
	///
	/// # Errors
	///
	/// - [`ResolveError::InvalidConfiguration`] for a missing policy, an
	///   unparseable location, a missing primary relationship, or a failing
	///   local source factory.
	/// - [`ResolveError::OriginDenied`] for the first location the policy
	///   rejects.
	pub fn build(self) -> Result<Resolver> {
		let Some(policy) = self.origin_policy else {
			return Err(ResolveError::invalid(
				"no origin policy set; use OriginPolicy::allow_by_default() if no restriction is desired",
			));
		};

		let mut locations = Vec::with_capacity(self.locations.len());
		for location in self.locations {
			let location = location?;
			if !policy.is_allowed(&location) {
				warn!(domain = "origin", resolver = &*self.label, %location, "location rejected by origin policy");
				return Err(ResolveError::OriginDenied { location });
			}
			locations.push(location);
		}

		let Some(primary) = self.primary else {
			return Err(ResolveError::invalid("no primary relationship set"));
		};

		let local = match self.local {
			LocalSource::Provider(provider) => provider,
			LocalSource::Factory(open) => open(&locations)?,
		};

		debug!(
			domain = "resolve",
			resolver = &*self.label,
			locations = locations.len(),
			fallbacks = self.fallbacks.len(),
			resources = self.resources_enabled,
			"resolver built",
		);

		Ok(Resolver {
			label: self.label,
			locations,
			local,
			primary,
			fallbacks: self.fallbacks,
			resources_enabled: self.resources_enabled,
			sink: self.sink,
			cache: ResolvedCache::default(),
		})
	}
}
