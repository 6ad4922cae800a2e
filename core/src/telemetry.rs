use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Hvilket rådgiverkall som telles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryKind {
    Chat,
    Plan,
}

impl AdvisoryKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AdvisoryKind::Chat => "chat",
            AdvisoryKind::Plan => "plan",
        }
    }
}

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

fn register(counter: IntCounterVec) -> IntCounterVec {
    // Registrering skjer én gang per prosess; feil her er en programmeringsfeil
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("elcruce counter registered twice");
    counter
}

static ADVISORY_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    register(
        IntCounterVec::new(
            Opts::new("elcruce_advisory_requests_total", "Kall mot rådgivertjenesten"),
            &["kind"],
        )
        .expect("valid counter opts"),
    )
});

static ADVISORY_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    register(
        IntCounterVec::new(
            Opts::new("elcruce_advisory_failures_total", "Feilede kall mot rådgivertjenesten"),
            &["kind"],
        )
        .expect("valid counter opts"),
    )
});

pub fn record_advisory_request(kind: AdvisoryKind) {
    ADVISORY_REQUESTS.with_label_values(&[kind.as_str()]).inc();
}

pub fn record_advisory_failure(kind: AdvisoryKind) {
    ADVISORY_FAILURES.with_label_values(&[kind.as_str()]).inc();
}

pub fn advisory_requests(kind: AdvisoryKind) -> u64 {
    ADVISORY_REQUESTS.with_label_values(&[kind.as_str()]).get()
}

pub fn advisory_failures(kind: AdvisoryKind) -> u64 {
    ADVISORY_FAILURES.with_label_values(&[kind.as_str()]).get()
}

/// Prometheus tekstformat for alle tellere i `REGISTRY`.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
