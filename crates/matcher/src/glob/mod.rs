//! Restricted glob syntax.
//!
//! Only two metacharacters exist: `*` matches any run of characters
//! (including none) and `?` matches exactly one character. Everything else
//! is a literal, including characters that are special in regular
//! expressions, so `"."` only ever matches a dot.
//!
//! A compiled [`Glob`] always matches the whole candidate string, never a
//! substring of it.

use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;
use thiserror::Error;


/// The regex engine rejected the translated expression.
///
/// Literal runs are escaped before compilation, so this only happens when a
/// pattern exceeds the engine's size limits.
#[derive(Debug, Error)]
#[error("invalid glob pattern {pattern:?}: {source}")]
pub struct GlobError {
	/// The glob as it was given.
	pub pattern: String,
	#[source]
	source: regex::Error,
}

/// A compiled glob pattern.
///
/// Two globs compare equal when their source patterns are identical.
#[derive(Clone)]
pub struct Glob {
	pattern: Box<str>,
	regex: Regex,
}

impl Glob {
	/// Compiles `pattern`.
	///
	/// Compilation is deterministic and has no side effects. The empty
	/// pattern matches only the empty string.
	pub fn new(pattern: &str) -> Result<Self, GlobError> {
		let regex = Regex::new(&translate(pattern)).map_err(|source| GlobError {
			pattern: pattern.to_owned(),
			source,
		})?;
		Ok(Self {
			pattern: pattern.into(),
			regex,
		})
	}

	/// Returns `true` if the whole of `candidate` matches.
	#[inline]
	pub fn matches(&self, candidate: &str) -> bool {
		self.regex.is_match(candidate)
	}

	/// The source pattern.
	pub fn as_str(&self) -> &str {
		&self.pattern
	}
}

/// Translates a glob into an anchored regular expression.
///
/// Literal runs are accumulated and escaped as a unit; each metacharacter
/// flushes the pending run before emitting its own fragment.
fn translate(pattern: &str) -> String {
	let mut out = String::with_capacity(pattern.len() + 16);
	let mut literal = String::new();

	out.push_str(r"\A(?s:");
	for ch in pattern.chars() {
		match ch {
			'*' | '?' => {
				if !literal.is_empty() {
					out.push_str(&regex::escape(&literal));
					literal.clear();
				}
				out.push_str(if ch == '*' { ".*" } else { "." });
			}
			_ => literal.push(ch),
		}
	}
	if !literal.is_empty() {
		out.push_str(&regex::escape(&literal));
	}
	out.push_str(r")\z");
	out
}

impl PartialEq for Glob {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for Glob {}

impl Hash for Glob {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.pattern.hash(state);
	}
}

impl fmt::Debug for Glob {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Glob").field(&self.pattern).finish()
	}
}

impl fmt::Display for Glob {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.pattern)
	}
}
