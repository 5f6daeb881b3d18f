//! Configuration loading and environment parsing.

use super::validation::validate_config;
use super::Config;
use serde_json::Value;
use std::path::Path;

/// Load configuration with the following precedence (highest last):
/// 1) Defaults compiled into the binary
/// 2) `LOBBY_WARDEN_CONFIG_JSON` env var containing raw JSON
/// 3) File pointed at by `LOBBY_WARDEN_CONFIG_PATH`
/// 4) `config.json` in the current working directory
/// 5) Per-field env overrides with prefix `LOBBY_WARDEN` and `__` as the
///    nested separator, e.g. `LOBBY_WARDEN__JOIN_QUEUE__ENABLED=false`
///
/// Errors while reading or parsing any source are printed to stderr and
/// that source is skipped; `load()` always returns a `Config`. Validation
/// problems are reported the same way — callers that need hard failure
/// should run [`validate_config`] themselves.
#[must_use]
pub fn load() -> Config {
    let defaults = Config::default();
    let mut merged =
        serde_json::to_value(&defaults).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

    if let Ok(json) = std::env::var("LOBBY_WARDEN_CONFIG_JSON") {
        if let Some(value) = parse_json_document(&json, "LOBBY_WARDEN_CONFIG_JSON") {
            merge_values(&mut merged, value);
        }
    }

    if let Ok(path) = std::env::var("LOBBY_WARDEN_CONFIG_PATH") {
        merge_file_source(&mut merged, Path::new(&path));
    }

    merge_file_source(&mut merged, Path::new("config.json"));

    apply_env_overrides(&mut merged);

    let config = match serde_json::from_value::<Config>(merged) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to deserialize config; using defaults: {e}");
            defaults
        }
    };

    if let Err(e) = validate_config(&config) {
        eprintln!("Configuration validation error: {e}");
    }

    config
}

fn parse_json_document(raw: &str, label: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("Failed to parse config from {label}: {err}");
            None
        }
    }
}

fn merge_file_source(target: &mut Value, path: &Path) {
    if path.as_os_str().is_empty() || !path.exists() {
        return;
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => {
            if let Some(value) = parse_json_document(&contents, &format!("file {}", path.display()))
            {
                merge_values(target, value);
            }
        }
        Err(err) => {
            eprintln!("Failed to read config from {}: {}", path.display(), err);
        }
    }
}

fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target_slot, source_value) => {
            *target_slot = source_value;
        }
    }
}

fn apply_env_overrides(root: &mut Value) {
    for (key, raw_value) in std::env::vars() {
        let Some(stripped) = key.strip_prefix("LOBBY_WARDEN__") else {
            continue;
        };

        let segments: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();

        if segments.is_empty() {
            continue;
        }

        let value = parse_scalar(raw_value.trim());
        set_nested_value(root, &segments, value);
    }
}

fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }

    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn set_nested_value(target: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    let Some(map) = target.as_object_mut() else {
        return;
    };

    if rest.is_empty() {
        map.insert(head.clone(), value);
    } else {
        let entry = map
            .entry(head.clone())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        set_nested_value(entry, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_source_scalars_and_keeps_unrelated_keys() {
        let mut target = serde_json::json!({
            "join_queue": { "enabled": true, "connection_timeout_ms": 3000 }
        });
        let source = serde_json::json!({
            "join_queue": { "connection_timeout_ms": 9000 }
        });
        merge_values(&mut target, source);
        assert_eq!(target["join_queue"]["connection_timeout_ms"], 9000);
        assert_eq!(target["join_queue"]["enabled"], true);
    }

    #[test]
    fn set_nested_value_builds_intermediate_objects() {
        let mut root = Value::Object(serde_json::Map::new());
        set_nested_value(
            &mut root,
            &["join_queue".to_string(), "enabled".to_string()],
            Value::Bool(false),
        );
        assert_eq!(root["join_queue"]["enabled"], false);
    }

    #[test]
    fn scalar_parsing_falls_back_to_string() {
        assert_eq!(parse_scalar("500"), Value::from(500));
        assert_eq!(parse_scalar("true"), Value::Bool(true));
        assert_eq!(parse_scalar("daily"), Value::String("daily".to_string()));
    }
}
