// KPI and chart data domain models
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Chart id -> series payload. The payload shape belongs to the chart
/// renderer and is never inspected here.
pub type ChartData = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiValue {
    Number(f64),
    Text(String),
}

impl Default for KpiValue {
    fn default() -> Self {
        KpiValue::Number(0.0)
    }
}

impl From<f64> for KpiValue {
    fn from(value: f64) -> Self {
        KpiValue::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: KpiValue,
    /// Signed percentage change against the previous period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
}

impl KpiRecord {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<KpiValue>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            change: None,
        }
    }

    pub fn with_change(mut self, change: f64) -> Self {
        self.change = Some(change);
        self
    }

    /// Build a record from a patch for a KPI that does not exist yet.
    pub fn from_patch(patch: KpiPatch) -> Self {
        Self {
            id: patch.id,
            label: patch.label.unwrap_or_default(),
            value: patch.value.unwrap_or_default(),
            change: patch.change,
        }
    }

    pub fn merge(&mut self, patch: KpiPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(change) = patch.change {
            self.change = Some(change);
        }
    }
}

/// Partial KPI update as delivered by the push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiPatch {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<KpiValue>,
    #[serde(default)]
    pub change: Option<f64>,
}

impl KpiPatch {
    pub fn value(id: impl Into<String>, value: impl Into<KpiValue>) -> Self {
        Self {
            id: id.into(),
            label: None,
            value: Some(value.into()),
            change: None,
        }
    }
}

/// Metric keys a metrics update may carry, each bound to a fixed chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKey {
    Revenue,
    Reservations,
    Occupancy,
}

impl MetricKey {
    pub const ALL: [MetricKey; 3] = [MetricKey::Revenue, MetricKey::Reservations, MetricKey::Occupancy];

    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "revenue" => Some(MetricKey::Revenue),
            "reservations" => Some(MetricKey::Reservations),
            "occupancy" => Some(MetricKey::Occupancy),
            _ => None,
        }
    }

    pub fn chart_id(self) -> &'static str {
        match self {
            MetricKey::Revenue => "revenue-chart",
            MetricKey::Reservations => "reservations-trend",
            MetricKey::Occupancy => "court-usage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_only_overwrites_supplied_fields() {
        let mut record = KpiRecord::new("revenue", "Revenue", 1200.0).with_change(4.5);
        record.merge(KpiPatch::value("revenue", 1500.0));

        assert_eq!(record.label, "Revenue");
        assert_eq!(record.value, KpiValue::Number(1500.0));
        assert_eq!(record.change, Some(4.5));
    }

    #[test]
    fn test_from_patch_fills_defaults() {
        let record = KpiRecord::from_patch(KpiPatch {
            id: "occupancy".to_string(),
            label: None,
            value: None,
            change: Some(-2.0),
        });
        assert_eq!(record.label, "");
        assert_eq!(record.value, KpiValue::Number(0.0));
        assert_eq!(record.change, Some(-2.0));
    }

    #[test]
    fn test_value_accepts_numbers_and_strings() {
        let patch: KpiPatch = serde_json::from_value(json!({"id": "a", "value": 12})).unwrap();
        assert_eq!(patch.value, Some(KpiValue::Number(12.0)));

        let patch: KpiPatch = serde_json::from_value(json!({"id": "b", "value": "85%"})).unwrap();
        assert_eq!(patch.value, Some(KpiValue::Text("85%".to_string())));
    }

    #[test]
    fn test_metric_chart_table() {
        for key in MetricKey::ALL {
            let name = match key {
                MetricKey::Revenue => "revenue",
                MetricKey::Reservations => "reservations",
                MetricKey::Occupancy => "occupancy",
            };
            assert_eq!(MetricKey::parse(name), Some(key));
        }
        assert_eq!(MetricKey::Revenue.chart_id(), "revenue-chart");
        assert_eq!(MetricKey::Reservations.chart_id(), "reservations-trend");
        assert_eq!(MetricKey::Occupancy.chart_id(), "court-usage");
        assert_eq!(MetricKey::parse("members"), None);
    }
}
