// Push-channel metric update messages
use super::metrics::KpiPatch;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub const METRICS_UPDATE_TYPE: &str = "metrics:update";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Realtime,
    Batch,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    #[serde(default, deserialize_with = "lenient_patches")]
    pub kpi_updates: Option<Vec<KpiPatch>>,
    #[serde(default)]
    pub metrics: Option<Map<String, Value>>,
}

impl UpdatePayload {
    pub fn kpi_updates(&self) -> &[KpiPatch] {
        self.kpi_updates.as_deref().unwrap_or_default()
    }
}

/// Entries that are not valid patches are skipped; the rest of the list stands.
fn lenient_patches<'de, D>(deserializer: D) -> Result<Option<Vec<KpiPatch>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(entries) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let patches = entries
        .iter()
        .filter_map(|entry| match KpiPatch::deserialize(entry) {
            Ok(patch) => Some(patch),
            Err(e) => {
                tracing::debug!("Skipping malformed KPI update {}: {}", entry, e);
                None
            }
        })
        .collect();
    Ok(Some(patches))
}

/// A push message that was recognized as a metrics update.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricUpdateMessage {
    pub id: String,
    pub payload: UpdatePayload,
}
