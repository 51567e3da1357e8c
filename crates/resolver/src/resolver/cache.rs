//! Per-name single-flight memoization.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::artifact::Artifact;

type Slot = Arc<Mutex<Option<Artifact>>>;

/// Resolved artifacts, keyed by name.
///
/// # Invariants
///
/// - Each name has one slot for the lifetime of the cache. The slot lock is
///   held across resolution, so concurrent callers for the same name
///   serialize and only the first one resolves.
/// - The map lock is only held to find or create a slot, never across
///   resolution, so unrelated names never wait on each other.
/// - Only successes are stored. A failed name's slot is dropped again once
///   no other caller holds it, so misses do not accumulate.
#[derive(Default)]
pub(crate) struct ResolvedCache {
	slots: Mutex<FxHashMap<Box<str>, Slot>>,
}

impl ResolvedCache {
	/// Returns the cached artifact for `name`, or runs `resolve` under the
	/// name's lock and caches a successful result.
	pub(crate) fn get_or_resolve<F>(&self, name: &str, resolve: F) -> Option<Artifact>
	where
		F: FnOnce() -> Option<Artifact>,
	{
		let slot = self.slot(name);
		let mut resolved = slot.lock();

		if let Some(artifact) = resolved.as_ref() {
			trace!(domain = "resolve", name, "cache hit");
			return Some(artifact.clone());
		}

		let Some(artifact) = resolve() else {
			drop(resolved);
			self.evict_if_unused(name, &slot);
			return None;
		};
		*resolved = Some(artifact.clone());
		Some(artifact)
	}

	/// Removes an empty slot that only the map and `slot` still reference.
	///
	/// Callers that picked the slot up before this runs keep it alive and
	/// retry under its lock; later callers get a fresh one.
	fn evict_if_unused(&self, name: &str, slot: &Slot) {
		let mut slots = self.slots.lock();
		let unused = slots.get(name).is_some_and(|current| Arc::ptr_eq(current, slot))
			&& Arc::strong_count(slot) == 2
			&& slot.lock().is_none();
		if unused {
			slots.remove(name);
		}
	}

	/// Peeks at a cached artifact without resolving.
	///
	/// Waits if `name` is currently being resolved.
	pub(crate) fn get(&self, name: &str) -> Option<Artifact> {
		let slot = self.slots.lock().get(name).cloned()?;
		let resolved = slot.lock();
		resolved.clone()
	}

	#[cfg(test)]
	fn len(&self) -> usize {
		self.slots.lock().len()
	}

	fn slot(&self, name: &str) -> Slot {
		let mut slots = self.slots.lock();
		if let Some(slot) = slots.get(name) {
			return Arc::clone(slot);
		}
		let slot = Slot::default();
		slots.insert(name.into(), Arc::clone(&slot));
		slot
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	#[test]
	fn test_only_successes_are_cached() {
		let cache = ResolvedCache::default();
		let calls = AtomicUsize::new(0);

		assert!(cache.get_or_resolve("x", || {
			calls.fetch_add(1, Ordering::SeqCst);
			None
		})
		.is_none());
		assert!(cache.get("x").is_none());
		assert_eq!(cache.len(), 0);

		let first = cache
			.get_or_resolve("x", || {
				calls.fetch_add(1, Ordering::SeqCst);
				Some(Artifact::new("p:x", "x", "p"))
			})
			.unwrap();
		let second = cache.get_or_resolve("x", || unreachable!()).unwrap();

		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert!(Artifact::ptr_eq(&first, &second));
		assert!(Artifact::ptr_eq(&first, &cache.get("x").unwrap()));
		assert_eq!(cache.len(), 1);
	}

	#[test]
	fn test_misses_do_not_accumulate() {
		let cache = ResolvedCache::default();
		for i in 0..100 {
			assert!(cache.get_or_resolve(&format!("missing.{i}"), || None).is_none());
		}
		assert_eq!(cache.len(), 0);
	}

	#[test]
	fn test_held_slot_survives_a_miss() {
		let cache = ResolvedCache::default();
		let held = cache.slot("x");

		assert!(cache.get_or_resolve("x", || None).is_none());
		assert_eq!(cache.len(), 1);

		*held.lock() = Some(Artifact::new("p:x", "x", "p"));
		assert!(cache.get("x").is_some());
	}
}
