use crate::consts;
use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("whatsapp_relay_statds")
        .with_description("WhatsApp relay statistics")
        .with_unit("event")
        .build()
});

fn incr_statds(metric: &str, value: &str) {
    STATDS.add(1, &[KeyValue::new(metric.to_string(), value.to_string())]);
}

/// Metric label for an inbound message type. The type comes from the request
/// body, so only the types the Cloud API documents get their own series.
fn message_type_label(msg_type: Option<&str>) -> &'static str {
    match msg_type {
        None => "unknown",
        Some(msg_type) => consts::INBOUND_MESSAGE_TYPES
            .iter()
            .find(|known| **known == msg_type)
            .copied()
            .unwrap_or("other"),
    }
}

pub fn incr_message_type_statds(msg_type: Option<&str>) {
    incr_statds("message_type", message_type_label(msg_type))
}

pub fn incr_reply_statds(outcome: &str) {
    incr_statds("reply", outcome)
}

pub fn incr_send_statds(outcome: &str) {
    incr_statds("send", outcome)
}
