use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use stratum_resolver::{IsolationLevel, MemoryProvider, OriginPolicy, Relationship, Resolver};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Debug, Default)]
struct Captured {
	level: Option<Level>,
	domain: Option<String>,
	name: Option<String>,
	message: String,
}

impl Visit for Captured {
	fn record_str(&mut self, field: &Field, value: &str) {
		match field.name() {
			"domain" => self.domain = Some(value.to_owned()),
			"name" => self.name = Some(value.to_owned()),
			_ => {}
		}
	}

	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			self.message = format!("{value:?}");
		}
	}
}

/// Collects WARN events.
#[derive(Clone, Default)]
struct WarnCapture(Arc<Mutex<Vec<Captured>>>);

impl<S: Subscriber> Layer<S> for WarnCapture {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let level = *event.metadata().level();
		if level != Level::WARN {
			return;
		}
		let mut captured = Captured {
			level: Some(level),
			..Captured::default()
		};
		event.record(&mut captured);
		self.0.lock().push(captured);
	}
}

fn transitional() -> Resolver {
	let upstream = MemoryProvider::new("up").with_artifact("legacy.Helper").with_artifact("shared");
	let local = MemoryProvider::new("local").with_artifact("shared");
	Resolver::builder()
		.with_origin_policy(OriginPolicy::allow_by_default())
		.with_primary(
			Relationship::builder(Arc::new(upstream))
				.isolation(IsolationLevel::Transitional)
				.build()
				.unwrap(),
		)
		.with_local_source(Arc::new(local))
		.build()
		.unwrap()
}

#[test]
fn tracing_sink_warns_on_upstream_only_resolution() {
	let capture = WarnCapture::default();
	let subscriber = tracing_subscriber::registry().with(capture.clone());

	tracing::subscriber::with_default(subscriber, || {
		let resolver = transitional();
		assert_eq!(resolver.resolve("legacy.Helper").unwrap().provider(), "up");
		assert_eq!(resolver.resolve("shared").unwrap().provider(), "local");
		// Cached: no second advisory.
		resolver.resolve("legacy.Helper").unwrap();
	});

	let events = capture.0.lock();
	assert_eq!(events.len(), 1, "{events:?}");
	let event = &events[0];
	assert_eq!(event.level, Some(Level::WARN));
	assert_eq!(event.domain.as_deref(), Some("isolation"));
	assert_eq!(event.name.as_deref(), Some("legacy.Helper"));
	assert!(event.message.contains("up:legacy.Helper"), "{}", event.message);
	assert!(event.message.contains("full isolation"), "{}", event.message);
}

#[test]
fn advisories_never_change_results() {
	let quiet = Resolver::builder()
		.with_origin_policy(OriginPolicy::allow_by_default())
		.with_primary(
			Relationship::builder(Arc::new(MemoryProvider::new("up").with_artifact("legacy.Helper")))
				.isolation(IsolationLevel::Transitional)
				.build()
				.unwrap(),
		)
		.with_diagnostics(stratum_resolver::NullSink)
		.build()
		.unwrap();

	assert_eq!(
		quiet.resolve("legacy.Helper").unwrap(),
		transitional().resolve("legacy.Helper").unwrap()
	);
}
