use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{OriginError, Result};

/// A configured source location, such as `https://host/lib.bundle` or a
/// local path (held as a `file:` URL).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
	url: Url,
}

impl Location {
	/// Parses an absolute URL.
	pub fn parse(location: &str) -> Result<Self> {
		Url::parse(location)
			.map(|url| Self { url })
			.map_err(|e| OriginError::InvalidLocation {
				location: location.to_owned(),
				reason: e.to_string(),
			})
	}

	/// Builds a `file:` location from an absolute filesystem path.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		Url::from_file_path(path)
			.map(|url| Self { url })
			.map_err(|()| OriginError::InvalidLocation {
				location: path.display().to_string(),
				reason: "not an absolute path".into(),
			})
	}

	/// The URL scheme, always lower-case.
	pub fn scheme(&self) -> &str {
		self.url.scheme()
	}

	/// The full external form of the location.
	pub fn as_str(&self) -> &str {
		self.url.as_str()
	}

	/// The underlying URL.
	pub fn as_url(&self) -> &Url {
		&self.url
	}

	/// The filesystem path, for `file:` locations that denote one.
	pub fn to_file_path(&self) -> Option<PathBuf> {
		if self.scheme() != "file" {
			return None;
		}
		self.url.to_file_path().ok()
	}
}

impl From<Url> for Location {
	fn from(url: Url) -> Self {
		Self { url }
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
