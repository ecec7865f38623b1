// Update buffer - Coalesces realtime updates until the next scheduled flush
use crate::application::metrics_store::MetricsStore;
use crate::domain::update::UpdatePayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushOutcome {
    pub messages: usize,
    pub kpi_patches: usize,
}

impl FlushOutcome {
    pub fn is_empty(&self) -> bool {
        self.messages == 0
    }
}

/// Pending realtime payloads keyed by message id. Iteration follows the
/// order in which each id was first inserted; re-inserting an id replaces
/// its payload in place.
#[derive(Debug, Clone, Default)]
pub struct UpdateBuffer {
    entries: Vec<(String, UpdatePayload)>,
}

impl UpdateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, message_id: String, payload: UpdatePayload) {
        match self.entries.iter_mut().find(|(id, _)| *id == message_id) {
            Some((_, existing)) => *existing = payload,
            None => self.entries.push((message_id, payload)),
        }
    }

    /// Drop everything without applying it.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Apply every buffered `kpiUpdates` list to `store` in buffer order and
    /// empty the buffer. Chart `metrics` are not replayed from here.
    pub fn flush(&mut self, store: &mut MetricsStore) -> FlushOutcome {
        let mut outcome = FlushOutcome::default();
        for (_, payload) in self.entries.drain(..) {
            outcome.messages += 1;
            outcome.kpi_patches += store.apply_kpi_patches(payload.kpi_updates());
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{KpiPatch, KpiValue};
    use crate::domain::update::UpdateKind;
    use serde_json::json;

    fn realtime(patches: Vec<KpiPatch>) -> UpdatePayload {
        UpdatePayload {
            kind: UpdateKind::Realtime,
            kpi_updates: Some(patches),
            metrics: None,
        }
    }

    #[test]
    fn test_flush_applies_in_buffer_order_and_empties() {
        let mut buffer = UpdateBuffer::new();
        let mut store = MetricsStore::new();
        buffer.insert("b".to_string(), realtime(vec![KpiPatch::value("occupancy", 1.0)]));
        buffer.insert("a".to_string(), realtime(vec![KpiPatch::value("occupancy", 2.0)]));
        buffer.insert("c".to_string(), realtime(vec![KpiPatch::value("occupancy", 3.0)]));

        let outcome = buffer.flush(&mut store);

        assert_eq!(outcome, FlushOutcome { messages: 3, kpi_patches: 3 });
        assert!(buffer.is_empty());
        assert_eq!(store.kpis().len(), 1);
        assert_eq!(store.kpi("occupancy").unwrap().value, KpiValue::Number(3.0));
    }

    #[test]
    fn test_reinserted_id_keeps_its_slot() {
        let mut buffer = UpdateBuffer::new();
        let mut store = MetricsStore::new();
        buffer.insert("m1".to_string(), realtime(vec![KpiPatch::value("revenue", 1.0)]));
        buffer.insert("m2".to_string(), realtime(vec![KpiPatch::value("revenue", 2.0)]));
        buffer.insert("m1".to_string(), realtime(vec![KpiPatch::value("revenue", 9.0)]));
        assert_eq!(buffer.len(), 2);

        buffer.flush(&mut store);
        assert_eq!(store.kpi("revenue").unwrap().value, KpiValue::Number(2.0));
    }

    #[test]
    fn test_flush_skips_chart_metrics() {
        let mut buffer = UpdateBuffer::new();
        let mut store = MetricsStore::new();
        let mut payload = realtime(vec![]);
        payload.metrics = json!({"revenue": [1, 2]}).as_object().cloned();
        buffer.insert("m1".to_string(), payload);

        let outcome = buffer.flush(&mut store);
        assert_eq!(outcome.messages, 1);
        assert!(store.charts().is_empty());
    }

    #[test]
    fn test_empty_flush_is_noop() {
        let mut buffer = UpdateBuffer::new();
        let mut store = MetricsStore::new();
        assert!(buffer.flush(&mut store).is_empty());
        assert!(store.kpis().is_empty());
    }
}
