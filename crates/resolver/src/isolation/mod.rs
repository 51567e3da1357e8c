//! Isolation levels and the choosers they select.
//!
//! A chooser decides, for one relationship and one name, between the
//! upstream artifact (from the relationship's provider) and the local one
//! (from the resolver's own space). Local always wins when present; the
//! level only matters when upstream is the sole source:
//!
//! | upstream | local | `None`   | `Transitional`        | `Full` |
//! |----------|-------|----------|-----------------------|--------|
//! | no       | no    | -        | -                     | -      |
//! | no       | yes   | local    | local                 | local  |
//! | yes      | no    | upstream | upstream + advisory   | -      |
//! | yes      | yes   | local    | local                 | local  |
//!
//! The advisory callback is the only level-dependent side effect and never
//! changes the returned value.

use std::hash::Hash;

use indexmap::IndexSet;
use serde::Deserialize;

#[cfg(test)]
mod tests;

/// How strictly a relationship hides upstream-only artifacts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationLevel {
	/// Upstream artifacts leak into the local space.
	#[default]
	None,
	/// Like [`IsolationLevel::None`], but advises about every upstream-only
	/// result that [`IsolationLevel::Full`] would hide.
	Transitional,
	/// Only local, exported, preferred or allowlisted artifacts are visible.
	Full,
}

impl IsolationLevel {
	/// Chooses between single upstream and local values.
	///
	/// `advise` is invoked with the upstream value under
	/// [`IsolationLevel::Transitional`] when it is returned without a local
	/// counterpart.
	pub fn choose<T>(self, upstream: Option<T>, local: Option<T>, advise: impl FnOnce(&T)) -> Option<T> {
		match (upstream, local) {
			(_, Some(local)) => Some(local),
			(None, None) => None,
			(Some(upstream), None) => match self {
				IsolationLevel::None => Some(upstream),
				IsolationLevel::Transitional => {
					advise(&upstream);
					Some(upstream)
				}
				IsolationLevel::Full => None,
			},
		}
	}

	/// Chooses between upstream and local lists.
	///
	/// An empty list means "absent". When only one side is present it is
	/// returned unchanged. When both are, [`IsolationLevel::Full`] keeps the
	/// local list and the other levels merge local entries first, then
	/// upstream ones, dropping duplicates while keeping first occurrences.
	///
	/// Under [`IsolationLevel::Transitional`], `advise` receives the upstream
	/// list whenever any of it is returned, since those are exactly the
	/// entries [`IsolationLevel::Full`] would drop.
	pub fn choose_list<T>(self, upstream: Vec<T>, local: Vec<T>, advise: impl FnOnce(&[T])) -> Vec<T>
	where
		T: Eq + Hash,
	{
		if upstream.is_empty() {
			return local;
		}
		if self == IsolationLevel::Full {
			return local;
		}
		if self == IsolationLevel::Transitional {
			advise(&upstream);
		}
		if local.is_empty() {
			return upstream;
		}

		let mut merged: IndexSet<T> = IndexSet::with_capacity(local.len() + upstream.len());
		merged.extend(local);
		merged.extend(upstream);
		merged.into_iter().collect()
	}
}

impl std::fmt::Display for IsolationLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			IsolationLevel::None => write!(f, "none"),
			IsolationLevel::Transitional => write!(f, "transitional"),
			IsolationLevel::Full => write!(f, "full"),
		}
	}
}
