// Widget domain model - layout units and their per-type configuration
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    Kpi,
    Chart,
    List,
    QuickActions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Area,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiWidgetConfig {
    pub kpi_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartWidgetConfig {
    pub chart_type: ChartKind,
    pub data_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWidgetConfig {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickActionsWidgetConfig {
    /// Empty means every configured quick action is shown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_ids: Vec<String>,
}

/// Per-type widget configuration. The widget's `type` tag is derived from
/// the variant, so a widget can never carry a config for another type.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetConfig {
    Kpi(KpiWidgetConfig),
    Chart(ChartWidgetConfig),
    List(ListWidgetConfig),
    QuickActions(QuickActionsWidgetConfig),
}

impl WidgetConfig {
    pub fn widget_type(&self) -> WidgetType {
        match self {
            WidgetConfig::Kpi(_) => WidgetType::Kpi,
            WidgetConfig::Chart(_) => WidgetType::Chart,
            WidgetConfig::List(_) => WidgetType::List,
            WidgetConfig::QuickActions(_) => WidgetType::QuickActions,
        }
    }

    fn to_value(&self) -> serde_json::Value {
        let value = match self {
            WidgetConfig::Kpi(c) => serde_json::to_value(c),
            WidgetConfig::Chart(c) => serde_json::to_value(c),
            WidgetConfig::List(c) => serde_json::to_value(c),
            WidgetConfig::QuickActions(c) => serde_json::to_value(c),
        };
        // Plain derived structs always serialize to a JSON object.
        value.unwrap_or(serde_json::Value::Null)
    }

    pub fn from_value(widget_type: WidgetType, value: serde_json::Value) -> Result<Self, WidgetConfigError> {
        let config = match widget_type {
            WidgetType::Kpi => WidgetConfig::Kpi(serde_json::from_value(value)?),
            WidgetType::Chart => WidgetConfig::Chart(serde_json::from_value(value)?),
            WidgetType::List => WidgetConfig::List(serde_json::from_value(value)?),
            WidgetType::QuickActions => {
                // quick-actions widgets are allowed to omit their config entirely
                if value.is_null() {
                    WidgetConfig::QuickActions(QuickActionsWidgetConfig::default())
                } else {
                    WidgetConfig::QuickActions(serde_json::from_value(value)?)
                }
            }
        };
        Ok(config)
    }
}

#[derive(Debug, Error)]
#[error("invalid widget config: {0}")]
pub struct WidgetConfigError(#[from] serde_json::Error);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WidgetRecord", into = "WidgetRecord")]
pub struct Widget {
    pub id: String,
    pub title: String,
    pub position: Position,
    pub size: Size,
    pub config: WidgetConfig,
    pub is_visible: bool,
}

impl Widget {
    pub fn new(id: impl Into<String>, title: impl Into<String>, position: Position, size: Size, config: WidgetConfig) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            position,
            size,
            config,
            is_visible: true,
        }
    }

    pub fn widget_type(&self) -> WidgetType {
        self.config.widget_type()
    }

    /// Merge the supplied fields of `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: WidgetPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(config) = patch.config {
            self.config = config;
        }
        if let Some(is_visible) = patch.is_visible {
            self.is_visible = is_visible;
        }
    }
}

/// Wire shape of a widget: `type` and `config` side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WidgetRecord {
    id: String,
    #[serde(rename = "type")]
    widget_type: WidgetType,
    title: String,
    position: Position,
    size: Size,
    #[serde(default)]
    config: serde_json::Value,
    #[serde(default = "default_visible")]
    is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl TryFrom<WidgetRecord> for Widget {
    type Error = WidgetConfigError;

    fn try_from(record: WidgetRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            config: WidgetConfig::from_value(record.widget_type, record.config)?,
            id: record.id,
            title: record.title,
            position: record.position,
            size: record.size,
            is_visible: record.is_visible,
        })
    }
}

impl From<Widget> for WidgetRecord {
    fn from(widget: Widget) -> Self {
        Self {
            widget_type: widget.widget_type(),
            config: widget.config.to_value(),
            id: widget.id,
            title: widget.title,
            position: widget.position,
            size: widget.size,
            is_visible: widget.is_visible,
        }
    }
}

/// Partial widget update. A config patch carries its own type, so it may
/// also change what kind of widget this is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetPatch {
    pub title: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub config: Option<WidgetConfig>,
    pub is_visible: Option<bool>,
}

/// The canonical layout a fresh dashboard (or a layout reset) starts from.
pub fn default_widgets() -> Vec<Widget> {
    let kpi = |id: &str, title: &str, x: i32| {
        Widget::new(
            format!("kpi-{id}"),
            title,
            Position::new(x, 0),
            Size::new(3, 2),
            WidgetConfig::Kpi(KpiWidgetConfig { kpi_id: id.to_string() }),
        )
    };
    let chart = |id: &str, title: &str, kind: ChartKind, data_key: &str, position: Position| {
        Widget::new(
            id,
            title,
            position,
            Size::new(6, 4),
            WidgetConfig::Chart(ChartWidgetConfig {
                chart_type: kind,
                data_key: data_key.to_string(),
            }),
        )
    };

    vec![
        kpi("revenue", "Revenue", 0),
        kpi("reservations", "Reservations", 3),
        kpi("occupancy", "Occupancy", 6),
        kpi("members", "Active Members", 9),
        chart("revenue-chart", "Revenue Trend", ChartKind::Line, "revenue", Position::new(0, 2)),
        chart("reservations-trend", "Reservations", ChartKind::Bar, "reservations", Position::new(6, 2)),
        chart("court-usage", "Court Usage", ChartKind::Pie, "occupancy", Position::new(0, 6)),
        Widget::new(
            "upcoming-reservations",
            "Upcoming Reservations",
            Position::new(6, 6),
            Size::new(6, 4),
            WidgetConfig::List(ListWidgetConfig {
                source: "reservations".to_string(),
                limit: Some(10),
            }),
        ),
        Widget::new(
            "quick-actions",
            "Quick Actions",
            Position::new(0, 10),
            Size::new(12, 2),
            WidgetConfig::QuickActions(QuickActionsWidgetConfig::default()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_widgets_have_unique_ids() {
        let widgets = default_widgets();
        let mut ids: Vec<&str> = widgets.iter().map(|w| w.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), widgets.len());
        assert!(widgets.iter().all(|w| w.is_visible));
    }

    #[test]
    fn test_widget_wire_shape() {
        let widget = Widget::new(
            "revenue-chart",
            "Revenue",
            Position::new(0, 2),
            Size::new(6, 4),
            WidgetConfig::Chart(ChartWidgetConfig {
                chart_type: ChartKind::Line,
                data_key: "revenue".to_string(),
            }),
        );

        let value = serde_json::to_value(&widget).unwrap();
        assert_eq!(value["type"], "chart");
        assert_eq!(value["config"], json!({"chartType": "line", "dataKey": "revenue"}));
        assert_eq!(value["isVisible"], true);
        assert_eq!(value["size"], json!({"width": 6, "height": 4}));

        let back: Widget = serde_json::from_value(value).unwrap();
        assert_eq!(back, widget);
    }

    #[test]
    fn test_config_must_match_type() {
        let value = json!({
            "id": "w1",
            "type": "chart",
            "title": "Broken",
            "position": {"x": 0, "y": 0},
            "size": {"width": 1, "height": 1},
            "config": {"kpiId": "revenue"},
            "isVisible": true
        });
        assert!(serde_json::from_value::<Widget>(value).is_err());
    }

    #[test]
    fn test_quick_actions_config_may_be_omitted() {
        let value = json!({
            "id": "qa",
            "type": "quick-actions",
            "title": "Actions",
            "position": {"x": 0, "y": 0},
            "size": {"width": 12, "height": 2}
        });
        let widget: Widget = serde_json::from_value(value).unwrap();
        assert_eq!(widget.widget_type(), WidgetType::QuickActions);
        assert!(widget.is_visible);
    }

    #[test]
    fn test_apply_patch_keeps_unspecified_fields() {
        let mut widget = default_widgets().remove(0);
        let original_size = widget.size;
        widget.apply(WidgetPatch {
            title: Some("Gross Revenue".to_string()),
            ..WidgetPatch::default()
        });
        assert_eq!(widget.title, "Gross Revenue");
        assert_eq!(widget.size, original_size);
        assert_eq!(widget.widget_type(), WidgetType::Kpi);
    }
}
