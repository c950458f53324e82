use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub store_mutations_total: IntCounterVec,
    pub stop_completions_total: IntCounter,
    pub chat_replies_total: IntCounter,
    pub event_subscribers: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let store_mutations_total = IntCounterVec::new(
            Opts::new(
                "store_mutations_total",
                "Store mutations by operation and outcome",
            ),
            &["operation", "outcome"],
        )
        .expect("valid store_mutations_total metric");

        let stop_completions_total =
            IntCounter::new("stop_completions_total", "Stops marked completed")
                .expect("valid stop_completions_total metric");

        let chat_replies_total = IntCounter::new(
            "chat_replies_total",
            "Assistant replies appended to chat threads",
        )
        .expect("valid chat_replies_total metric");

        let event_subscribers = IntGauge::new(
            "event_subscribers",
            "Currently connected websocket subscribers",
        )
        .expect("valid event_subscribers metric");

        registry
            .register(Box::new(store_mutations_total.clone()))
            .expect("register store_mutations_total");
        registry
            .register(Box::new(stop_completions_total.clone()))
            .expect("register stop_completions_total");
        registry
            .register(Box::new(chat_replies_total.clone()))
            .expect("register chat_replies_total");
        registry
            .register(Box::new(event_subscribers.clone()))
            .expect("register event_subscribers");

        Self {
            registry,
            store_mutations_total,
            stop_completions_total,
            chat_replies_total,
            event_subscribers,
        }
    }

    pub fn record_mutation(&self, operation: &str, ok: bool) {
        let outcome = if ok { "success" } else { "error" };
        self.store_mutations_total
            .with_label_values(&[operation, outcome])
            .inc();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
