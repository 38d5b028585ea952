//! Dashboard preferences and widget layout.
//!
//! Both are stored as JSON under [`keys::DASHBOARD_PREFERENCES`] and
//! [`keys::WIDGET_SETTINGS`] with camelCase field names. On load, stored
//! values are merged over the defaults: missing fields and unknown widgets
//! keep their defaults, and an unreadable document is ignored.

use super::storage::{keys, load_json, save_json, Storage};
use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Default,
    Compact,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartsPeriod {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl ChartsPeriod {
    /// Summary period in days.
    pub fn days(&self) -> u32 {
        match self {
            ChartsPeriod::Week => 7,
            ChartsPeriod::Month => 30,
            ChartsPeriod::Quarter => 90,
            ChartsPeriod::Year => 365,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardPreferences {
    pub theme: Theme,
    pub layout: Layout,
    pub charts_period: ChartsPeriod,
    pub currency: String,
    pub date_format: String,
    pub auto_refresh: bool,
    /// Milliseconds.
    pub refresh_interval: u64,
    pub show_animations: bool,
    pub sound_enabled: bool,
    pub compact_mode: bool,
}

impl Default for DashboardPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            layout: Layout::Default,
            charts_period: ChartsPeriod::Month,
            currency: "BRL".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            auto_refresh: true,
            refresh_interval: 600_000,
            show_animations: true,
            sound_enabled: true,
            compact_mode: false,
        }
    }
}

impl DashboardPreferences {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval)
    }

    /// `Auto` resolves through the platform's dark-mode preference.
    pub fn current_theme(&self, prefers_dark: bool) -> Theme {
        match self.theme {
            Theme::Auto if prefers_dark => Theme::Dark,
            Theme::Auto => Theme::Light,
            theme => theme,
        }
    }
}

/// One dashboard widget. Widget-specific options are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub enabled: bool,
    pub position: u32,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl Widget {
    fn new(position: u32, options: Value) -> Self {
        Self {
            enabled: true,
            position,
            options: match options {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }

    pub fn option_u64(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(Value::as_u64)
    }
}

/// Widgets by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetSettings(pub BTreeMap<String, Widget>);

impl Default for WidgetSettings {
    fn default() -> Self {
        let widgets = [
            ("metrics", Widget::new(0, json!({"visible": ["receitas", "despesas", "saldo", "efficiency"]}))),
            ("insights", Widget::new(1, json!({"maxItems": 3}))),
            ("alerts", Widget::new(2, json!({"types": ["financial", "system", "goals"]}))),
            ("charts", Widget::new(3, json!({"layout": "side-by-side"}))),
            ("analytics", Widget::new(4, json!({"visible": ["kpis", "trends", "goals"]}))),
            ("activity", Widget::new(5, json!({"recentTransactions": 10, "showSystemMonitoring": true}))),
        ];
        Self(
            widgets
                .into_iter()
                .map(|(key, widget)| (key.to_string(), widget))
                .collect(),
        )
    }
}

impl WidgetSettings {
    pub fn get(&self, key: &str) -> Option<&Widget> {
        self.0.get(key)
    }

    /// Flip `enabled`. Returns the new state, or `None` for an unknown key.
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        self.0.get_mut(key).map(|widget| {
            widget.enabled = !widget.enabled;
            widget.enabled
        })
    }

    /// Assign positions from `order`. Unknown keys are skipped; widgets not
    /// named keep their position.
    pub fn reorder(&mut self, order: &[&str]) {
        for (index, key) in order.iter().enumerate() {
            if let Some(widget) = self.0.get_mut(*key) {
                widget.position = index as u32;
            }
        }
    }

    /// Keys of enabled widgets by ascending position.
    pub fn enabled(&self) -> Vec<String> {
        let mut enabled: Vec<(&String, &Widget)> = self.0.iter().filter(|(_, w)| w.enabled).collect();
        enabled.sort_by_key(|(key, widget)| (widget.position, key.as_str()));
        enabled.into_iter().map(|(key, _)| key.clone()).collect()
    }
}

pub fn load_preferences(storage: &dyn Storage) -> DashboardPreferences {
    load_json(storage, keys::DASHBOARD_PREFERENCES).unwrap_or_default()
}

pub fn save_preferences(storage: &dyn Storage, preferences: &DashboardPreferences) -> Result<()> {
    save_json(storage, keys::DASHBOARD_PREFERENCES, preferences)
}

/// Stored widgets replace the default entry with the same key.
pub fn load_widgets(storage: &dyn Storage) -> WidgetSettings {
    let mut widgets = WidgetSettings::default();
    if let Some(saved) = load_json::<WidgetSettings>(storage, keys::WIDGET_SETTINGS) {
        widgets.0.extend(saved.0);
    }
    widgets
}

pub fn save_widgets(storage: &dyn Storage, widgets: &WidgetSettings) -> Result<()> {
    save_json(storage, keys::WIDGET_SETTINGS, widgets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::storage::MemoryStorage;

    #[test]
    fn test_stored_preferences_merge_over_defaults() {
        let storage = MemoryStorage::new();
        storage
            .set(keys::DASHBOARD_PREFERENCES, r#"{"theme":"dark","chartsPeriod":"90d"}"#)
            .unwrap();

        let prefs = load_preferences(&storage);
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.charts_period.days(), 90);
        assert_eq!(prefs.currency, "BRL");
        assert_eq!(prefs.refresh_interval(), Duration::from_secs(600));
    }

    #[test]
    fn test_unreadable_preferences_fall_back() {
        let storage = MemoryStorage::new();
        storage.set(keys::DASHBOARD_PREFERENCES, "{not json").unwrap();
        assert_eq!(load_preferences(&storage), DashboardPreferences::default());
    }

    #[test]
    fn test_camel_case_round_trip() {
        let value = serde_json::to_value(DashboardPreferences::default()).unwrap();
        assert_eq!(value["autoRefresh"], true);
        assert_eq!(value["refreshInterval"], 600_000);
        assert_eq!(value["chartsPeriod"], "30d");
    }

    #[test]
    fn test_widget_order_and_toggle() {
        let mut widgets = WidgetSettings::default();
        assert_eq!(
            widgets.enabled(),
            vec!["metrics", "insights", "alerts", "charts", "analytics", "activity"]
        );

        assert_eq!(widgets.toggle("alerts"), Some(false));
        assert_eq!(widgets.toggle("nope"), None);
        widgets.reorder(&["activity", "metrics"]);
        assert_eq!(widgets.enabled()[..2], ["activity".to_string(), "insights".to_string()]);
    }

    #[test]
    fn test_stored_widgets_keep_options() {
        let storage = MemoryStorage::new();
        storage
            .set(
                keys::WIDGET_SETTINGS,
                r#"{"activity":{"enabled":false,"position":9,"recentTransactions":5}}"#,
            )
            .unwrap();

        let widgets = load_widgets(&storage);
        let activity = widgets.get("activity").unwrap();
        assert!(!activity.enabled);
        assert_eq!(activity.option_u64("recentTransactions"), Some(5));
        assert!(widgets.get("metrics").unwrap().enabled);
    }
}
