use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use stratum_matcher::Glob;

use crate::location::Location;

/// A definitive verdict for a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
	/// The location may be used.
	Allow,
	/// The location must not be used.
	Deny,
}

impl Decision {
	/// Returns `true` for [`Decision::Allow`].
	#[inline]
	pub fn is_allow(self) -> bool {
		self == Decision::Allow
	}

	fn as_match(self) -> MatchResult {
		match self {
			Decision::Allow => MatchResult::Allow,
			Decision::Deny => MatchResult::Deny,
		}
	}
}

impl fmt::Display for Decision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Decision::Allow => write!(f, "allow"),
			Decision::Deny => write!(f, "deny"),
		}
	}
}

/// Outcome of running one filter against a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchResult {
	/// The filter matched and allows the location.
	Allow,
	/// The filter matched and denies the location.
	Deny,
	/// The filter has no opinion on this location.
	NoMatch,
}

impl MatchResult {
	/// Returns `true` unless this is [`MatchResult::NoMatch`].
	#[inline]
	pub fn matches(self) -> bool {
		self != MatchResult::NoMatch
	}

	/// The decision of a matching filter.
	///
	/// # Panics
	///
	/// Panics on [`MatchResult::NoMatch`]. A non-match carries no decision,
	/// and reading one is a caller bug that must not silently become a deny.
	#[track_caller]
	pub fn decision(self) -> Decision {
		match self {
			MatchResult::Allow => Decision::Allow,
			MatchResult::Deny => Decision::Deny,
			MatchResult::NoMatch => panic!("MatchResult::decision() called on a non-match"),
		}
	}
}

/// A single link of an origin policy chain.
pub trait LocationFilter: fmt::Debug + Send + Sync {
	/// Checks `location`, returning [`MatchResult::NoMatch`] if this filter
	/// does not apply to it.
	fn check(&self, location: &Location) -> MatchResult;
}

/// Matches locations whose scheme is in a fixed set.
#[derive(Clone, Debug)]
pub struct SchemeFilter {
	schemes: BTreeSet<String>,
	decision: Decision,
}

impl SchemeFilter {
	/// Creates a filter over `schemes` (compared case-insensitively).
	pub fn new<I, S>(schemes: I, decision: Decision) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self {
			schemes: schemes.into_iter().map(|s| s.as_ref().to_ascii_lowercase()).collect(),
			decision,
		}
	}
}

impl LocationFilter for SchemeFilter {
	fn check(&self, location: &Location) -> MatchResult {
		if self.schemes.contains(location.scheme()) {
			self.decision.as_match()
		} else {
			MatchResult::NoMatch
		}
	}
}

/// Matches `file:` locations by their containing directory.
///
/// Non-recursive filters match files whose immediate parent is the
/// directory; recursive filters match any descendant. Paths are compared
/// component-wise and are never canonicalized, so symlinks are not followed.
#[derive(Clone, Debug)]
pub struct DirectoryFilter {
	directory: PathBuf,
	recursive: bool,
	decision: Decision,
}

impl DirectoryFilter {
	/// Creates a filter for `directory`.
	pub fn new(directory: impl Into<PathBuf>, recursive: bool, decision: Decision) -> Self {
		Self {
			directory: directory.into(),
			recursive,
			decision,
		}
	}
}

impl LocationFilter for DirectoryFilter {
	fn check(&self, location: &Location) -> MatchResult {
		let Some(path) = location.to_file_path() else {
			return MatchResult::NoMatch;
		};

		let hit = if self.recursive {
			path.ancestors().skip(1).any(|dir| dir == self.directory.as_path())
		} else {
			path.parent() == Some(self.directory.as_path())
		};

		if hit { self.decision.as_match() } else { MatchResult::NoMatch }
	}
}

/// Matches locations whose full external form matches a glob.
#[derive(Clone, Debug)]
pub struct GlobFilter {
	glob: Glob,
	decision: Decision,
}

impl GlobFilter {
	/// Creates a filter from a compiled glob.
	pub fn new(glob: Glob, decision: Decision) -> Self {
		Self { glob, decision }
	}
}

impl LocationFilter for GlobFilter {
	fn check(&self, location: &Location) -> MatchResult {
		if self.glob.matches(location.as_str()) {
			self.decision.as_match()
		} else {
			MatchResult::NoMatch
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn loc(s: &str) -> Location {
		Location::parse(s).unwrap()
	}

	#[test]
	fn test_match_result_decision() {
		assert_eq!(MatchResult::Allow.decision(), Decision::Allow);
		assert_eq!(MatchResult::Deny.decision(), Decision::Deny);
		assert!(MatchResult::Deny.matches());
		assert!(!MatchResult::NoMatch.matches());
	}

	#[test]
	#[should_panic(expected = "non-match")]
	fn test_decision_on_no_match_panics() {
		let _ = MatchResult::NoMatch.decision();
	}

	#[rstest]
	#[case("https://host/a.bundle", MatchResult::Allow)]
	#[case("HTTPS://host/a.bundle", MatchResult::Allow)]
	#[case("http://host/a.bundle", MatchResult::NoMatch)]
	#[case("file:///tmp/a.bundle", MatchResult::NoMatch)]
	fn test_scheme_filter(#[case] location: &str, #[case] expected: MatchResult) {
		let filter = SchemeFilter::new(["HTTPS"], Decision::Allow);
		assert_eq!(filter.check(&loc(location)), expected);
	}

	#[test]
	fn test_glob_filter_uses_external_form() {
		let filter = GlobFilter::new(Glob::new("http://localhost:4567/*").unwrap(), Decision::Deny);
		assert_eq!(filter.check(&loc("http://localhost:4567/test.bundle")), MatchResult::Deny);
		assert_eq!(filter.check(&loc("http://localhost:4568/test.bundle")), MatchResult::NoMatch);
	}

	#[cfg(unix)]
	#[test]
	fn test_directory_filter() {
		let in_dir = Location::from_path("/opt/libs/test.bundle").unwrap();
		let in_subdir = Location::from_path("/opt/libs/sub/test2.bundle").unwrap();
		let outside = Location::from_path("/opt/test3.bundle").unwrap();
		let remote = loc("https://host/opt/libs/test.bundle");

		let flat = DirectoryFilter::new("/opt/libs", false, Decision::Allow);
		assert_eq!(flat.check(&in_dir), MatchResult::Allow);
		assert_eq!(flat.check(&in_subdir), MatchResult::NoMatch);
		assert_eq!(flat.check(&outside), MatchResult::NoMatch);
		assert_eq!(flat.check(&remote), MatchResult::NoMatch);

		let deep = DirectoryFilter::new("/opt/libs/", true, Decision::Allow);
		assert_eq!(deep.check(&in_dir), MatchResult::Allow);
		assert_eq!(deep.check(&in_subdir), MatchResult::Allow);
		assert_eq!(deep.check(&outside), MatchResult::NoMatch);
	}
}
