// Persistence layer - Allow-listed dashboard snapshot to and from durable storage
use crate::application::snapshot_storage::{SnapshotStorage, StorageError};
use crate::domain::filters::Filters;
use crate::domain::quick_action::QuickAction;
use crate::domain::widget::Widget;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Bumped whenever the snapshot shape changes incompatibly. Snapshots with
/// another version are discarded on restore.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The durable subset of dashboard state. KPI data, chart data, edit mode,
/// the dragged widget and loading states are never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub widgets: Vec<Widget>,
    pub filters: Filters,
    pub real_time_enabled: bool,
    pub quick_actions: Vec<QuickAction>,
}

/// State recovered from a snapshot. A field is `None` when the snapshot did
/// not carry a usable value for it; the engine keeps its default there.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestoredState {
    pub widgets: Option<Vec<Widget>>,
    pub filters: Option<Filters>,
    pub real_time_enabled: Option<bool>,
    pub quick_actions: Option<Vec<QuickAction>>,
}

impl RestoredState {
    pub fn is_empty(&self) -> bool {
        self.widgets.is_none()
            && self.filters.is_none()
            && self.real_time_enabled.is_none()
            && self.quick_actions.is_none()
    }
}

/// Stored state read field by field, so one bad field does not cost the rest.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialSnapshot {
    widgets: Option<Value>,
    filters: Option<Value>,
    real_time_enabled: Option<Value>,
    quick_actions: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSnapshot<T> {
    version: u32,
    state: T,
}

pub fn to_persistable(
    widgets: &[Widget],
    filters: &Filters,
    real_time_enabled: bool,
    quick_actions: &[QuickAction],
) -> PersistedSnapshot {
    PersistedSnapshot {
        widgets: widgets.to_vec(),
        filters: filters.clone(),
        real_time_enabled,
        quick_actions: quick_actions.to_vec(),
    }
}

/// Duplicate widget and quick action ids are dropped, first occurrence wins.
pub fn from_persistable(snapshot: PersistedSnapshot) -> RestoredState {
    RestoredState {
        widgets: Some(dedup_by_id(snapshot.widgets, |w| &w.id)),
        filters: Some(snapshot.filters),
        real_time_enabled: Some(snapshot.real_time_enabled),
        quick_actions: Some(dedup_by_id(snapshot.quick_actions, |a| &a.id)),
    }
}

fn from_partial(partial: PartialSnapshot) -> RestoredState {
    RestoredState {
        widgets: partial
            .widgets
            .and_then(|v| lenient_list::<Widget>("widgets", v))
            .map(|widgets| dedup_by_id(widgets, |w| &w.id)),
        filters: partial.filters.and_then(|v| lenient_field("filters", v)),
        real_time_enabled: partial.real_time_enabled.and_then(|v| lenient_field("realTimeEnabled", v)),
        quick_actions: partial
            .quick_actions
            .and_then(|v| lenient_list::<QuickAction>("quickActions", v))
            .map(|actions| dedup_by_id(actions, |a| &a.id)),
    }
}

fn dedup_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> &String) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.iter().any(|u| id(u) == id(&item)) {
            unique.push(item);
        }
    }
    unique
}

fn lenient_field<T: DeserializeOwned>(field: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Ignoring stored {}: {}", field, e);
            None
        }
    }
}

/// Elements that fail to parse are skipped. A non-empty list in which nothing
/// parses counts as absent.
fn lenient_list<T: DeserializeOwned>(field: &str, value: Value) -> Option<Vec<T>> {
    let Value::Array(items) = value else {
        tracing::warn!("Ignoring stored {}: not a list", field);
        return None;
    };
    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Skipping stored {} entry {}: {}", field, index, e);
                None
            }
        })
        .collect();

    if total > 0 && parsed.is_empty() {
        return None;
    }
    Some(parsed)
}

#[derive(Clone)]
pub struct Persistence {
    storage: Arc<dyn SnapshotStorage>,
}

impl Persistence {
    pub fn new(storage: Arc<dyn SnapshotStorage>) -> Self {
        Self { storage }
    }

    /// Best effort: any failure is logged and treated as "nothing stored".
    pub fn restore(&self) -> Option<RestoredState> {
        match self.try_restore() {
            Ok(restored) => restored,
            Err(e) => {
                tracing::warn!("Could not restore dashboard snapshot, using defaults: {}", e);
                None
            }
        }
    }

    /// Best effort: a failed write leaves the in-memory state authoritative.
    pub fn save(&self, snapshot: &PersistedSnapshot) {
        if let Err(e) = self.try_save(snapshot) {
            tracing::warn!("Could not persist dashboard snapshot: {}", e);
        }
    }

    fn try_restore(&self) -> Result<Option<RestoredState>, StorageError> {
        let Some(contents) = self.storage.read()? else {
            return Ok(None);
        };
        let stored: StoredSnapshot<Value> = serde_json::from_str(&contents)?;
        if stored.version != SNAPSHOT_VERSION {
            tracing::info!(
                "Discarding dashboard snapshot with version {} (expected {})",
                stored.version,
                SNAPSHOT_VERSION
            );
            return Ok(None);
        }
        let partial: PartialSnapshot = serde_json::from_value(stored.state)?;
        let restored = from_partial(partial);
        Ok((!restored.is_empty()).then_some(restored))
    }

    fn try_save(&self, snapshot: &PersistedSnapshot) -> Result<(), StorageError> {
        let stored = StoredSnapshot {
            version: SNAPSHOT_VERSION,
            state: snapshot,
        };
        let contents = serde_json::to_string(&stored)?;
        self.storage.write(&contents)
    }
}
