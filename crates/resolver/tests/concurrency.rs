use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use stratum_resolver::{Artifact, Namespace, OriginPolicy, Provider, Relationship, Resolver};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Takes a while to answer and counts how often it was asked.
#[derive(Default)]
struct Slow {
	calls: AtomicUsize,
}

impl Provider for Slow {
	fn find(&self, name: &str, _namespace: Namespace) -> Option<Artifact> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		thread::sleep(Duration::from_millis(50));
		Some(Artifact::new(format!("slow:{name}"), name, "slow"))
	}
}

/// Blocks lookups of "held" until released; answers everything else at once.
struct Gate {
	entered: Mutex<Sender<()>>,
	release: Mutex<Receiver<()>>,
}

impl Provider for Gate {
	fn find(&self, name: &str, _namespace: Namespace) -> Option<Artifact> {
		if name == "held" {
			let _ = self.entered.lock().send(());
			let _ = self.release.lock().recv_timeout(TIMEOUT);
		}
		Some(Artifact::new(name, name, "gate"))
	}
}

fn resolver(provider: Arc<dyn Provider>) -> Resolver {
	let _ = tracing_subscriber::fmt::try_init();
	Resolver::builder()
		.with_origin_policy(OriginPolicy::allow_by_default())
		.with_primary(Relationship::builder(provider).build().unwrap())
		.build()
		.unwrap()
}

#[test]
fn concurrent_callers_share_one_resolution() {
	let slow = Arc::new(Slow::default());
	let resolver = resolver(slow.clone());

	let results: Vec<Artifact> = thread::scope(|s| {
		let handles: Vec<_> = (0..8).map(|_| s.spawn(|| resolver.resolve("x").unwrap())).collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
	assert!(results.iter().all(|a| Artifact::ptr_eq(a, &results[0])));
}

#[test]
fn distinct_names_resolve_independently() {
	let slow = Arc::new(Slow::default());
	let resolver = resolver(slow.clone());

	thread::scope(|s| {
		s.spawn(|| resolver.resolve("a").unwrap());
		s.spawn(|| resolver.resolve("b").unwrap());
	});

	assert_eq!(slow.calls.load(Ordering::SeqCst), 2);
	assert!(!Artifact::ptr_eq(
		&resolver.cached("a").unwrap(),
		&resolver.cached("b").unwrap()
	));
}

#[test]
fn unrelated_name_does_not_wait_for_pending_one() {
	let (entered_tx, entered_rx) = mpsc::channel();
	let (release_tx, release_rx) = mpsc::channel();
	let gate = Arc::new(Gate {
		entered: Mutex::new(entered_tx),
		release: Mutex::new(release_rx),
	});
	let resolver = resolver(gate);
	let resolver = &resolver;

	thread::scope(|s| {
		let held = s.spawn(move || resolver.resolve("held"));
		entered_rx.recv_timeout(TIMEOUT).unwrap();

		let (done_tx, done_rx) = mpsc::channel();
		s.spawn(move || done_tx.send(resolver.resolve("free").is_ok()));
		let free = done_rx.recv_timeout(TIMEOUT);

		release_tx.send(()).unwrap();
		assert_eq!(free, Ok(true));
		assert!(held.join().unwrap().is_ok());
	});
}
