// KPI/chart data store - Canonical display-ready metrics
use crate::domain::metrics::{ChartData, KpiPatch, KpiRecord, MetricKey};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct MetricsStore {
    kpis: Vec<KpiRecord>,
    charts: ChartData,
    last_update: Option<DateTime<Utc>>,
    last_realtime_update: Option<DateTime<Utc>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kpis(&self) -> &[KpiRecord] {
        &self.kpis
    }

    pub fn kpi(&self, id: &str) -> Option<&KpiRecord> {
        self.kpis.iter().find(|k| k.id == id)
    }

    pub fn charts(&self) -> &ChartData {
        &self.charts
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn last_realtime_update(&self) -> Option<DateTime<Utc>> {
        self.last_realtime_update
    }

    /// Insert if absent, otherwise merge only the supplied fields.
    pub fn upsert_kpi(&mut self, patch: KpiPatch) {
        match self.kpis.iter_mut().find(|k| k.id == patch.id) {
            Some(record) => record.merge(patch),
            None => self.kpis.push(KpiRecord::from_patch(patch)),
        }
    }

    /// Applies patches in order, so a later patch for the same id wins.
    pub fn apply_kpi_patches<'a>(&mut self, patches: impl IntoIterator<Item = &'a KpiPatch>) -> usize {
        let mut applied = 0;
        for patch in patches {
            self.upsert_kpi(patch.clone());
            applied += 1;
        }
        applied
    }

    /// Writes recognized metric keys verbatim to their charts. Returns how many
    /// charts were written; unrecognized keys are skipped.
    pub fn apply_metrics(&mut self, metrics: &Map<String, Value>) -> usize {
        let mut written = 0;
        for (key, series) in metrics {
            match MetricKey::parse(key) {
                Some(metric) => {
                    self.charts.insert(metric.chart_id().to_string(), series.clone());
                    written += 1;
                }
                None => tracing::debug!("Ignoring unrecognized metric key {}", key),
            }
        }
        written
    }

    /// Seeding from the initial fetch replaces the whole KPI list. Later
    /// duplicates of an id overwrite earlier ones.
    pub fn set_kpis(&mut self, records: Vec<KpiRecord>) {
        self.kpis.clear();
        for record in records {
            match self.kpis.iter_mut().find(|k| k.id == record.id) {
                Some(existing) => *existing = record,
                None => self.kpis.push(record),
            }
        }
    }

    pub fn set_chart(&mut self, chart_id: impl Into<String>, series: Value) {
        self.charts.insert(chart_id.into(), series);
    }

    pub fn mark_updated(&mut self, at: DateTime<Utc>) {
        self.last_update = Some(at);
    }

    pub fn mark_realtime_arrival(&mut self, at: DateTime<Utc>) {
        self.last_realtime_update = Some(at);
    }
}
