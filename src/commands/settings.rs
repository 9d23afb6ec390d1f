use crate::analysis::trend::{TrendPeriod, DEFAULT_MIN_HISTORY};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_SCHEMA_VERSION: i64 = 1;

#[derive(Debug, Clone)]
pub struct EffectiveDashboardSettings {
    pub analysis_delay: Duration,
    pub analysis_timeout: Duration,
    pub export_delay: Duration,
    pub trend_period: TrendPeriod,
    pub trend_min_history: usize,
    pub seed_demo_data: bool,
}

impl Default for EffectiveDashboardSettings {
    fn default() -> Self {
        effective_from(&default_settings())
    }
}

pub fn get_settings_internal(data_dir: &Path) -> Result<Value, String> {
    load_settings_from_disk(data_dir)
}

pub fn save_settings_internal(data_dir: &Path, settings: Value) -> Result<Value, String> {
    save_settings_to_disk(data_dir, settings)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_settings(state: tauri::State<'_, crate::state::app::AppState>) -> Result<Value, String> {
    get_settings_internal(state.data_dir())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn save_settings(
    settings: Value,
    state: tauri::State<'_, crate::state::app::AppState>,
) -> Result<Value, String> {
    save_settings_internal(state.data_dir(), settings)
}

pub fn load_effective_dashboard_settings(data_dir: &Path) -> Result<EffectiveDashboardSettings, String> {
    let settings = load_settings_from_disk(data_dir)?;
    Ok(effective_from(&settings))
}

fn effective_from(settings: &Value) -> EffectiveDashboardSettings {
    let millis = |key: &str, default: u64| {
        Duration::from_millis(settings.get(key).and_then(Value::as_u64).unwrap_or(default))
    };

    EffectiveDashboardSettings {
        analysis_delay: millis("analysisDelayMs", 2000),
        analysis_timeout: millis("analysisTimeoutMs", 15000),
        export_delay: millis("exportDelayMs", 1500),
        trend_period: settings
            .get("trendPeriod")
            .and_then(Value::as_str)
            .and_then(TrendPeriod::parse)
            .unwrap_or(TrendPeriod::Week),
        trend_min_history: settings
            .get("trendMinHistory")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MIN_HISTORY as u64) as usize,
        seed_demo_data: settings
            .get("seedDemoData")
            .and_then(Value::as_bool)
            .unwrap_or(true),
    }
}

pub fn load_settings_from_disk(data_dir: &Path) -> Result<Value, String> {
    let path = settings_path(data_dir);
    ensure_qatrack_dir(data_dir)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read settings.json: {e}"))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|e| {
            log::warn!("settings.json is not valid JSON, using defaults: {e}");
            json!({})
        })
    } else {
        json!({})
    };

    let normalized = normalize_settings(original.clone());
    if normalized != original || !path.exists() {
        write_settings_file(&path, &normalized)?;
    }

    Ok(normalized)
}

pub fn save_settings_to_disk(data_dir: &Path, settings: Value) -> Result<Value, String> {
    let path = settings_path(data_dir);
    ensure_qatrack_dir(data_dir)?;

    let mut merged = load_settings_from_disk(data_dir).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let normalized = normalize_settings(merged);
    write_settings_file(&path, &normalized)?;
    Ok(normalized)
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".qatrack").join("settings.json")
}

pub fn ensure_qatrack_dir(data_dir: &Path) -> Result<(), String> {
    let dir = data_dir.join(".qatrack");
    fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create .qatrack directory: {e}"))
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write settings.json: {e}"))
}

/// Fills missing keys from the defaults, sanitizes values and stamps the
/// schema version.
fn normalize_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    deep_merge_defaults(&mut out, &defaults);
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "analysisDelayMs": 2000,
        "analysisTimeoutMs": 15000,
        "exportDelayMs": 1500,
        "trendPeriod": "week",
        "trendMinHistory": DEFAULT_MIN_HISTORY,
        "seedDemoData": true,
        "theme": "system",
        "itemsPerPage": 10,
        "notificationsEnabled": true,
        "notifications": {
            "email": true,
            "issueAssigned": true,
            "qaCheckFailed": true
        }
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    // Clamp numerics.
    clamp_u64(obj, "analysisDelayMs", 0, 30_000, 2000);
    clamp_u64(obj, "analysisTimeoutMs", 1000, 120_000, 15000);
    clamp_u64(obj, "exportDelayMs", 0, 30_000, 1500);
    clamp_u64(obj, "trendMinHistory", 1, 50, DEFAULT_MIN_HISTORY as u64);
    clamp_u64(obj, "itemsPerPage", 5, 100, 10);

    // Validate enums.
    sanitize_enum(obj, "trendPeriod", &["week", "month", "year"], "week");
    sanitize_enum(obj, "theme", &["light", "dark", "system"], "system");

    // Bools with defaults.
    ensure_bool(obj, "seedDemoData", true);
    ensure_bool(obj, "notificationsEnabled", true);

    if let Some(notifications) = obj.get_mut("notifications").and_then(Value::as_object_mut) {
        for key in ["email", "issueAssigned", "qaCheckFailed"] {
            ensure_bool(notifications, key, true);
        }
    } else {
        obj.insert(
            "notifications".to_string(),
            json!({ "email": true, "issueAssigned": true, "qaCheckFailed": true }),
        );
    }
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn sanitize_enum(map: &mut Map<String, Value>, key: &str, allowed: &[&str], default: &str) {
    let valid = map
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| allowed.contains(value))
        .unwrap_or(default);
    map.insert(key.to_string(), json!(valid));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}
