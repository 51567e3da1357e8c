//! Error types for origin policies.

use stratum_matcher::GlobError;
use thiserror::Error;

/// Errors raised while building a policy or parsing a location.
#[derive(Debug, Error)]
pub enum OriginError {
	/// A location string or path could not be turned into a URL.
	#[error("invalid location {location:?}: {reason}")]
	InvalidLocation {
		/// The location as given.
		location: String,
		/// Why it was rejected.
		reason: String,
	},

	/// A glob filter pattern failed to compile.
	#[error(transparent)]
	Glob(#[from] GlobError),
}

/// Result type for origin operations.
pub type Result<T> = std::result::Result<T, OriginError>;
