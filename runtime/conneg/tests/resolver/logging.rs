//! Check the events emitted by the default observer.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use conneg::{BodyResolver, TypeDescriptor};
use googletest::{
    assert_that,
    prelude::{eq, len},
};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::fixtures::{CallTracker, SpyConverter, request};

type Fields = BTreeMap<String, String>;

/// A layer that keeps the level and the fields of every event it sees.
#[derive(Clone, Default)]
struct CapturingLayer(Arc<Mutex<Vec<(Level, Fields)>>>);

impl CapturingLayer {
    fn events(&self) -> Vec<(Level, Fields)> {
        self.0.lock().unwrap().clone()
    }
}

impl<S: Subscriber> Layer<S> for CapturingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

#[derive(Default)]
struct FieldVisitor(Fields);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

/// Resolve a `{}` body with the given content type into `Item`, capturing the emitted events.
fn capture(resolver: &BodyResolver, content_type: &str) -> Vec<(Level, Fields)> {
    let layer = CapturingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        let _ = resolver.resolve_request(
            request(Some(content_type), "{}"),
            &TypeDescriptor::named("Item"),
        );
    });
    layer.events()
}

fn field<'a>(fields: &'a Fields, name: &str) -> &'a str {
    fields
        .get(name)
        .unwrap_or_else(|| panic!("Missing `{name}` field in {fields:?}"))
}

#[test]
fn converter_selection_is_logged() {
    let tracker = CallTracker::default();
    let resolver =
        BodyResolver::new([SpyConverter::new("json", ["application/json"], &tracker).boxed()])
            .unwrap();

    let events = capture(&resolver, "application/json");

    assert_that!(events, len(eq(1)));
    let (level, fields) = &events[0];
    assert_eq!(*level, Level::DEBUG);
    assert_eq!(field(fields, "message"), "Reading request body");
    assert_eq!(field(fields, "converter"), "json");
    assert_eq!(field(fields, "read_path"), "concrete");
    assert_eq!(field(fields, "content_type"), "application/json");
    assert_eq!(field(fields, "target_type"), "Item");
}

#[test]
fn missing_converter_is_logged_with_the_acceptable_types() {
    let tracker = CallTracker::default();
    let resolver = BodyResolver::new([
        SpyConverter::new("json", ["application/json"], &tracker).boxed(),
        SpyConverter::new("text", ["text/plain"], &tracker).boxed(),
    ])
    .unwrap();

    let events = capture(&resolver, "application/xml");

    assert_that!(events, len(eq(1)));
    let (level, fields) = &events[0];
    assert_eq!(*level, Level::DEBUG);
    assert_eq!(
        field(fields, "message"),
        "No converter can read the request body"
    );
    assert_eq!(field(fields, "content_type"), "application/xml");
    assert_eq!(field(fields, "target_type"), "Item");
    assert_eq!(
        field(fields, "acceptable_types"),
        "application/json, text/plain"
    );
}

#[test]
fn read_failures_are_logged_with_the_error() {
    let tracker = CallTracker::default();
    let resolver = BodyResolver::new([SpyConverter::new("broken", ["application/json"], &tracker)
        .failing()
        .boxed()])
    .unwrap();

    let events = capture(&resolver, "application/json");

    assert_that!(events, len(eq(2)));
    let (level, fields) = &events[1];
    assert_eq!(*level, Level::DEBUG);
    assert_eq!(field(fields, "message"), "Failed to read the request body");
    assert_eq!(field(fields, "converter"), "broken");
    assert_eq!(field(fields, "content_type"), "application/json");
    assert_eq!(field(fields, "target_type"), "Item");
    assert_eq!(
        field(fields, "error.message"),
        "`broken` can't make sense of `{}`"
    );
}
