use std::path::PathBuf;
use std::sync::Arc;

use stratum_matcher::Glob;
use tracing::debug;

use crate::error::Result;
use crate::filter::{Decision, DirectoryFilter, GlobFilter, LocationFilter, MatchResult, SchemeFilter};
use crate::location::Location;


/// Ordered ALLOW/DENY filter chain with a default decision.
///
/// Filters are evaluated in the order they were added and the first one
/// that matches decides. When none match, the default decision applies.
///
/// Policies are built by fluent accumulation and never change afterwards,
/// so one policy can be shared by any number of resolver builders.
///
/// ```ignore
/// let policy = OriginPolicy::deny_by_default()
///     .allowing_schemes(["https"])
///     .allowing_directory("/opt/app/lib", true);
///
/// assert!(policy.is_allowed(&Location::parse("https://repo/x.bundle")?));
/// assert!(!policy.is_allowed(&Location::parse("http://repo/x.bundle")?));
/// ```
#[derive(Clone, Debug)]
pub struct OriginPolicy {
	default: Decision,
	filters: Vec<Arc<dyn LocationFilter>>,
}

impl OriginPolicy {
	/// A policy with no filters and the given default.
	pub fn new(default: Decision) -> Self {
		Self {
			default,
			filters: Vec::new(),
		}
	}

	/// A policy that allows anything no filter denies.
	pub fn allow_by_default() -> Self {
		Self::new(Decision::Allow)
	}

	/// A policy that denies anything no filter allows.
	pub fn deny_by_default() -> Self {
		Self::new(Decision::Deny)
	}

	/// Appends an arbitrary filter.
	pub fn with_filter(mut self, filter: impl LocationFilter + 'static) -> Self {
		self.filters.push(Arc::new(filter));
		self
	}

	/// Allows locations with any of `schemes`.
	pub fn allowing_schemes<I, S>(self, schemes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.with_filter(SchemeFilter::new(schemes, Decision::Allow))
	}

	/// Denies locations with any of `schemes`.
	pub fn denying_schemes<I, S>(self, schemes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.with_filter(SchemeFilter::new(schemes, Decision::Deny))
	}

	/// Allows locations whose external form matches `pattern`.
	pub fn allowing_glob(self, pattern: &str) -> Result<Self> {
		Ok(self.with_filter(GlobFilter::new(Glob::new(pattern)?, Decision::Allow)))
	}

	/// Denies locations whose external form matches `pattern`.
	pub fn denying_glob(self, pattern: &str) -> Result<Self> {
		Ok(self.with_filter(GlobFilter::new(Glob::new(pattern)?, Decision::Deny)))
	}

	/// Allows files in `directory` (or below it, if `recursive`).
	pub fn allowing_directory(self, directory: impl Into<PathBuf>, recursive: bool) -> Self {
		self.with_filter(DirectoryFilter::new(directory, recursive, Decision::Allow))
	}

	/// Denies files in `directory` (or below it, if `recursive`).
	pub fn denying_directory(self, directory: impl Into<PathBuf>, recursive: bool) -> Self {
		self.with_filter(DirectoryFilter::new(directory, recursive, Decision::Deny))
	}

	/// The decision applied when no filter matches.
	pub fn default_decision(&self) -> Decision {
		self.default
	}

	/// Number of filters in the chain.
	pub fn len(&self) -> usize {
		self.filters.len()
	}

	/// Returns `true` if the chain has no filters.
	pub fn is_empty(&self) -> bool {
		self.filters.is_empty()
	}

	/// Evaluates the chain for `location`.
	pub fn decide(&self, location: &Location) -> Decision {
		for (index, filter) in self.filters.iter().enumerate() {
			let result = filter.check(location);
			if result != MatchResult::NoMatch {
				let decision = result.decision();
				debug!(domain = "origin", %location, filter = index, %decision, "origin filter matched");
				return decision;
			}
		}
		debug!(domain = "origin", %location, decision = %self.default, "no origin filter matched; using default");
		self.default
	}

	/// Returns `true` if `location` may be used.
	pub fn is_allowed(&self, location: &Location) -> bool {
		self.decide(location).is_allow()
	}
}
