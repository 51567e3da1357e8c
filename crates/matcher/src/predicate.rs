//! Name predicates.
//!
//! Builders accept either a glob string or an arbitrary closure wherever a
//! name pattern is expected. Both end up as a [`NamePredicate`], so the
//! resolution code never needs to care which one it was given.

use std::fmt;
use std::sync::Arc;

use crate::glob::{Glob, GlobError};

type PredicateFn = dyn Fn(&str) -> bool + Send + Sync;

/// A compiled predicate over names.
#[derive(Clone)]
pub struct NamePredicate {
	kind: PredicateKind,
}

#[derive(Clone)]
enum PredicateKind {
	Glob(Glob),
	Fn(Arc<PredicateFn>),
}

impl NamePredicate {
	/// Compiles a glob pattern into a predicate.
	pub fn glob(pattern: &str) -> Result<Self, GlobError> {
		Glob::new(pattern).map(Self::from)
	}

	/// Wraps an arbitrary predicate.
	pub fn from_fn<F>(f: F) -> Self
	where
		F: Fn(&str) -> bool + Send + Sync + 'static,
	{
		Self {
			kind: PredicateKind::Fn(Arc::new(f)),
		}
	}

	/// Returns `true` if `name` satisfies this predicate.
	#[inline]
	pub fn matches(&self, name: &str) -> bool {
		match &self.kind {
			PredicateKind::Glob(glob) => glob.matches(name),
			PredicateKind::Fn(f) => f(name),
		}
	}

	/// The source glob, if this predicate was compiled from one.
	pub fn as_glob(&self) -> Option<&Glob> {
		match &self.kind {
			PredicateKind::Glob(glob) => Some(glob),
			PredicateKind::Fn(_) => None,
		}
	}
}

impl From<Glob> for NamePredicate {
	fn from(glob: Glob) -> Self {
		Self {
			kind: PredicateKind::Glob(glob),
		}
	}
}

impl fmt::Debug for NamePredicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			PredicateKind::Glob(glob) => f.debug_tuple("NamePredicate::Glob").field(&glob.as_str()).finish(),
			PredicateKind::Fn(_) => f.write_str("NamePredicate::Fn(..)"),
		}
	}
}

/// An uncompiled pattern, as accumulated by fluent builders.
///
/// Globs are compiled lazily by [`Pattern::compile`] so that adding a pattern
/// never fails; errors surface once, when the owning builder is built.
#[derive(Clone, Debug)]
pub enum Pattern {
	/// A glob in the restricted `*`/`?` syntax.
	Glob(String),
	/// An already-compiled predicate.
	Predicate(NamePredicate),
}

impl Pattern {
	/// Compiles this pattern.
	pub fn compile(self) -> Result<NamePredicate, GlobError> {
		match self {
			Pattern::Glob(pattern) => NamePredicate::glob(&pattern),
			Pattern::Predicate(predicate) => Ok(predicate),
		}
	}
}

impl From<&str> for Pattern {
	fn from(pattern: &str) -> Self {
		Pattern::Glob(pattern.to_owned())
	}
}

impl From<String> for Pattern {
	fn from(pattern: String) -> Self {
		Pattern::Glob(pattern)
	}
}

impl From<NamePredicate> for Pattern {
	fn from(predicate: NamePredicate) -> Self {
		Pattern::Predicate(predicate)
	}
}

impl From<Glob> for Pattern {
	fn from(glob: Glob) -> Self {
		Pattern::Predicate(glob.into())
	}
}

/// A set of predicates matched with "any" semantics.
///
/// Glob predicates with the same source pattern are stored once.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
	predicates: Vec<NamePredicate>,
}

impl PatternSet {
	/// Creates an empty set, which matches nothing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Compiles every pattern, failing on the first invalid glob.
	pub fn compile<I>(patterns: I) -> Result<Self, GlobError>
	where
		I: IntoIterator<Item = Pattern>,
	{
		let mut set = Self::new();
		for pattern in patterns {
			set.insert(pattern.compile()?);
		}
		Ok(set)
	}

	/// Adds a predicate.
	pub fn insert(&mut self, predicate: NamePredicate) {
		if let Some(glob) = predicate.as_glob()
			&& self.predicates.iter().any(|p| p.as_glob() == Some(glob))
		{
			return;
		}
		self.predicates.push(predicate);
	}

	/// Returns `true` if any predicate matches `name`.
	pub fn matches(&self, name: &str) -> bool {
		self.predicates.iter().any(|p| p.matches(name))
	}

	/// Number of predicates in the set.
	pub fn len(&self) -> usize {
		self.predicates.len()
	}

	/// Returns `true` if the set holds no predicates.
	pub fn is_empty(&self) -> bool {
		self.predicates.is_empty()
	}
}

impl FromIterator<NamePredicate> for PatternSet {
	fn from_iter<I: IntoIterator<Item = NamePredicate>>(iter: I) -> Self {
		let mut set = Self::new();
		for predicate in iter {
			set.insert(predicate);
		}
		set
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_glob_and_fn_predicates_agree() {
		let glob = NamePredicate::glob("core.*").unwrap();
		let f = NamePredicate::from_fn(|name| name.starts_with("core."));
		for name in ["core.Public", "core.", "corex", "other.core.Public"] {
			assert_eq!(glob.matches(name), f.matches(name), "{name}");
		}
	}

	#[test]
	fn test_empty_set_matches_nothing() {
		let set = PatternSet::new();
		assert!(set.is_empty());
		assert!(!set.matches(""));
		assert!(!set.matches("anything"));
	}

	#[test]
	fn test_set_matches_any() {
		let set = PatternSet::compile(["a.*".into(), "b.?".into()]).unwrap();
		assert!(set.matches("a.long.name"));
		assert!(set.matches("b.x"));
		assert!(!set.matches("b.xy"));
		assert!(!set.matches("c"));
	}

	#[test]
	fn test_duplicate_globs_stored_once() {
		let set = PatternSet::compile(["a.*".into(), "a.*".into(), "b".into()]).unwrap();
		assert_eq!(set.len(), 2);
	}

	#[test]
	fn test_closures_are_never_deduplicated() {
		let set: PatternSet = [
			NamePredicate::from_fn(|n| n == "x"),
			NamePredicate::from_fn(|n| n == "x"),
		]
		.into_iter()
		.collect();
		assert_eq!(set.len(), 2);
		assert!(set.matches("x"));
	}

	#[test]
	fn test_pattern_conversions() {
		let from_str: Pattern = "x.*".into();
		assert!(matches!(from_str, Pattern::Glob(ref g) if g == "x.*"));

		let from_pred: Pattern = NamePredicate::from_fn(|_| true).into();
		assert!(from_pred.compile().unwrap().matches("anything"));

		let from_glob: Pattern = Glob::new("?").unwrap().into();
		let compiled = from_glob.compile().unwrap();
		assert_eq!(compiled.as_glob().map(Glob::as_str), Some("?"));
	}
}
