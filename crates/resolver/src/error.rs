//! Error types for resolver construction and lookup.

use stratum_matcher::GlobError;
use stratum_origin::{Location, OriginError};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by resolver builders and lookups.
///
/// Construction errors ([`ResolveError::OriginDenied`],
/// [`ResolveError::InvalidConfiguration`]) abort the build. Lookup errors
/// are per call and never poison the resolver's cache.
#[derive(Debug, Error)]
pub enum ResolveError {
	/// No relationship supplied the name.
	///
	/// The wording is deliberately soft: the name itself may have been found
	/// while something it depends on, further down a provider's own graph,
	/// could not be.
	#[error(
		"could not fully resolve {name:?}; it is possible that {name:?} itself was found but an artifact it \
		 transitively requires was not"
	)]
	NotFound {
		/// The requested name.
		name: String,
	},

	/// A configured location was rejected by the origin policy.
	#[error("using {location} is forbidden by the origin policy")]
	OriginDenied {
		/// The rejected location.
		location: Location,
	},

	/// The resolver was built without support for the requested operation.
	#[error("{operation} is not supported by this resolver")]
	UnsupportedOperation {
		/// The rejected operation.
		operation: &'static str,
	},

	/// A builder was missing a required field or held an invalid value.
	#[error("invalid configuration: {message}")]
	InvalidConfiguration {
		/// What was wrong.
		message: String,
		/// The underlying error, if any.
		#[source]
		source: Option<BoxError>,
	},
}

impl ResolveError {
	/// Shorthand for an [`ResolveError::InvalidConfiguration`] without a source.
	pub fn invalid(message: impl Into<String>) -> Self {
		ResolveError::InvalidConfiguration {
			message: message.into(),
			source: None,
		}
	}

	/// Returns `true` for [`ResolveError::NotFound`].
	pub fn is_not_found(&self) -> bool {
		matches!(self, ResolveError::NotFound { .. })
	}
}

impl From<GlobError> for ResolveError {
	fn from(e: GlobError) -> Self {
		ResolveError::InvalidConfiguration {
			message: format!("pattern {:?} does not compile", e.pattern),
			source: Some(Box::new(e)),
		}
	}
}

impl From<OriginError> for ResolveError {
	fn from(e: OriginError) -> Self {
		ResolveError::InvalidConfiguration {
			message: e.to_string(),
			source: Some(Box::new(e)),
		}
	}
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
