// Update classifier - Decides what, if anything, a push message means to the dashboard
use crate::domain::update::{MetricUpdateMessage, UpdateKind, UpdatePayload, METRICS_UPDATE_TYPE};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Not a metrics update, or too malformed to act on.
    Ignored,
    Realtime(MetricUpdateMessage),
    Batch(MetricUpdateMessage),
}

/// Never fails: anything that cannot be understood is `Ignored`.
pub fn classify(message: &Value) -> Classification {
    let Some(message_type) = message.get("type").and_then(Value::as_str) else {
        tracing::debug!("Ignoring push message without a type tag");
        return Classification::Ignored;
    };
    if message_type != METRICS_UPDATE_TYPE {
        tracing::debug!("Ignoring push message of type {}", message_type);
        return Classification::Ignored;
    }

    let Some(id) = message.get("id").and_then(Value::as_str) else {
        tracing::debug!("Ignoring metrics update without a message id");
        return Classification::Ignored;
    };
    let Some(raw_payload) = message.get("payload") else {
        tracing::debug!("Ignoring metrics update {} without a payload", id);
        return Classification::Ignored;
    };

    let payload = match UpdatePayload::deserialize(raw_payload) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("Ignoring malformed metrics update {}: {}", id, e);
            return Classification::Ignored;
        }
    };

    let kind = payload.kind;
    let message = MetricUpdateMessage {
        id: id.to_string(),
        payload,
    };
    match kind {
        UpdateKind::Realtime => Classification::Realtime(message),
        UpdateKind::Batch => Classification::Batch(message),
    }
}
