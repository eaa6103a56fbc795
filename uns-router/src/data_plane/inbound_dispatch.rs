//! Inbound path: namespace resolution, middleware, then fan-out to matching consumers.

use crate::event::Event;
use crate::middleware::MiddlewarePipeline;
use crate::observability::{events, fields};
use crate::routing::consumer_directory::ConsumerDirectory;
use crate::routing::namespace_registry::NamespaceRegistry;
use crate::routing::pattern_cache::PatternMatcher;
use tracing::{debug, Level};

const COMPONENT: &str = "inbound_dispatch";

pub(crate) struct InboundDispatch<'a> {
    pub(crate) namespaces: &'a NamespaceRegistry,
    pub(crate) middleware: &'a MiddlewarePipeline,
    pub(crate) matcher: &'a PatternMatcher,
    pub(crate) consumers: &'a ConsumerDirectory,
}

impl InboundDispatch<'_> {
    /// Routes one inbound event. Returns the number of consumers that received it.
    ///
    /// Runs synchronously; consumer listeners are notified before this returns.
    pub(crate) fn dispatch(&self, connection_id: &str, mut event: Event) -> usize {
        if !event.is_routable() {
            debug!(
                event = events::INGRESS_DROP_INVALID,
                component = COMPONENT,
                connection_id,
                reason = fields::REASON_EMPTY_PATH,
                "dropping inbound event"
            );
            return 0;
        }

        event.namespace = self.namespaces.resolve(&event.path);
        event.source_connection_id = Some(connection_id.to_string());

        let Some(event) = self.middleware.run(event) else {
            debug!(
                event = events::INGRESS_DROP_MIDDLEWARE,
                component = COMPONENT,
                connection_id,
                reason = fields::REASON_MIDDLEWARE_DROP,
                "inbound event suppressed by middleware"
            );
            return 0;
        };

        let mut matched = 0;
        let mut delivered = 0;

        for subscriber in self.consumers.live_subscribers() {
            if !self.matcher.test(subscriber.pattern(), &event.path) {
                continue;
            }
            matched += 1;

            if subscriber.push(&event) {
                delivered += 1;
            } else {
                debug!(
                    event = events::CONSUMER_DECODE_SKIPPED,
                    component = COMPONENT,
                    consumer_id = subscriber.id(),
                    path = event.path.as_str(),
                    "consumer could not decode event"
                );
            }
        }

        if tracing::enabled!(Level::DEBUG) {
            let formatted = fields::FormattedEventFields::from_event(&event);
            debug!(
                event = events::DISPATCH_SUMMARY,
                component = COMPONENT,
                connection_id,
                path = formatted.path.as_str(),
                namespace = formatted.namespace.as_str(),
                source = formatted.source.as_str(),
                content_type = formatted.content_type.as_str(),
                matched,
                delivered,
                "dispatched inbound event"
            );
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::InboundDispatch;
    use crate::consumer::{decode, Consumer, Subscriber};
    use crate::event::{ContentType, Event};
    use crate::middleware::{MiddlewarePipeline, ReportByException};
    use crate::namespace::NamespaceConfig;
    use crate::routing::consumer_directory::ConsumerDirectory;
    use crate::routing::namespace_registry::NamespaceRegistry;
    use crate::routing::pattern_cache::PatternMatcher;
    use parking_lot::Mutex;
    use std::sync::{Arc, Weak};

    struct Fixture {
        namespaces: NamespaceRegistry,
        middleware: MiddlewarePipeline,
        matcher: PatternMatcher,
        consumers: ConsumerDirectory,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                namespaces: NamespaceRegistry::new(),
                middleware: MiddlewarePipeline::new(),
                matcher: PatternMatcher::new(),
                consumers: ConsumerDirectory::new(),
            }
        }

        fn dispatcher(&self) -> InboundDispatch<'_> {
            InboundDispatch {
                namespaces: &self.namespaces,
                middleware: &self.middleware,
                matcher: &self.matcher,
                consumers: &self.consumers,
            }
        }

        fn subscribe<T: 'static>(
            &self,
            pattern: &str,
            decode: decode::DecodeFn<T>,
        ) -> Arc<Consumer<T>> {
            let consumer = Arc::new(Consumer::new(pattern, decode));
            let weak: Weak<dyn Subscriber> = Arc::downgrade(&consumer) as Weak<dyn Subscriber>;
            self.consumers
                .register(weak, consumer.id(), consumer.pattern());
            consumer
        }
    }

    #[test]
    fn stamps_namespace_and_source_before_delivery() {
        let fixture = Fixture::new();
        fixture.namespaces.register(NamespaceConfig::new("Plant1/ERP"));
        let received = Arc::new(Mutex::new(Vec::new()));
        let consumer = fixture.subscribe("#", decode::event());
        let sink = received.clone();
        consumer.add_listener(move |event: &Event| sink.lock().push(event.clone()));

        let delivered = fixture.dispatcher().dispatch(
            "mqtt-in",
            Event::new("Plant1/ERP/Status", ContentType::String, "OK"),
        );

        assert_eq!(delivered, 1);
        let received = received.lock();
        assert_eq!(received[0].namespace.as_ref().unwrap().path, "Plant1/ERP");
        assert_eq!(received[0].source_connection_id.as_deref(), Some("mqtt-in"));
    }

    #[test]
    fn only_matching_consumers_receive() {
        let fixture = Fixture::new();
        let temperature = fixture.subscribe("Temperature", decode::scalar::<f64>());
        let line = fixture.subscribe("Site/Line1/#", decode::event());

        fixture.dispatcher().dispatch(
            "in",
            Event::new("Site/Cell/Temperature", ContentType::Double, "21.5"),
        );

        assert_eq!(temperature.delivered_count(), 1);
        assert_eq!(line.delivered_count(), 0);
    }

    #[test]
    fn decode_failure_only_skips_that_consumer() {
        let fixture = Fixture::new();
        let numeric = fixture.subscribe("#", decode::scalar::<i32>());
        let raw = fixture.subscribe("#", decode::event());

        let delivered = fixture
            .dispatcher()
            .dispatch("in", Event::new("Site/State", ContentType::String, "Running"));

        assert_eq!(delivered, 1);
        assert_eq!(numeric.delivered_count(), 0);
        assert_eq!(raw.delivered_count(), 1);
    }

    #[test]
    fn middleware_drop_and_empty_path_deliver_nothing() {
        let fixture = Fixture::new();
        fixture.middleware.add(Arc::new(ReportByException::new()));
        let consumer = fixture.subscribe("#", decode::event());
        let dispatcher = fixture.dispatcher();

        assert_eq!(
            dispatcher.dispatch("in", Event::new("", ContentType::String, "x")),
            0
        );
        assert_eq!(
            dispatcher.dispatch("in", Event::new("a/b", ContentType::String, "x")),
            1
        );
        assert_eq!(
            dispatcher.dispatch("in", Event::new("a/b", ContentType::String, "x")),
            0
        );
        assert_eq!(consumer.delivered_count(), 1);
    }
}
