use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::logging;

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// The log level to use, this is a tracing env filter
    pub level: String,

    /// What logging mode we should use
    pub mode: logging::Mode,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            mode: logging::Mode::Default,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config file extension: {0}")]
    UnsupportedExtension(String),
    #[error("config file root must be a table")]
    NotATable,
}

impl ConfigError {
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Loads a config by layering, from lowest to highest priority, the defaults
/// of `C`, the config file and the environment variables starting with
/// `{env_prefix}_`.
///
/// Nested keys are separated by a double underscore in environment variables,
/// `PHOTOGRAM_API__BIND_ADDRESS` sets `api.bind_address`.
///
/// A missing config file is only an error when `required` is set.
pub fn parse<C: Serialize + DeserializeOwned + Default>(
    env_prefix: &str,
    config_file: Option<&str>,
    required: bool,
) -> Result<(C, Option<String>), ConfigError> {
    let mut root = serde_json::to_value(C::default())?;

    let mut config_path = None;

    if let Some(path) = config_file {
        match read_file(path) {
            Ok(value) => {
                merge(&mut root, value);
                config_path = Some(
                    std::fs::canonicalize(path)
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| path.to_string()),
                );
            }
            Err(err) => {
                if required || !err.is_io() {
                    return Err(err);
                }

                tracing::debug!("failed to load config file: {}", err);
            }
        }
    }

    let prefix = format!("{}_", env_prefix.to_uppercase());
    for (key, raw) in std::env::vars() {
        let Some(key) = key.strip_prefix(&prefix) else {
            continue;
        };

        let path = key
            .split("__")
            .map(|segment| segment.to_lowercase())
            .collect::<Vec<_>>();

        set_env_value(&mut root, &path, raw);
    }

    Ok((serde_json::from_value(root)?, config_path))
}

fn read_file(path: &str) -> Result<Value, ConfigError> {
    // The default config file is given without extension, so we try the known ones.
    let candidates = if Path::new(path).extension().is_some() {
        vec![path.to_string()]
    } else {
        ["toml", "yaml", "yml", "json"]
            .iter()
            .map(|ext| format!("{path}.{ext}"))
            .collect()
    };

    let Some(file) = candidates.iter().find(|p| Path::new(p).is_file()) else {
        return Err(ConfigError::Io {
            path: path.to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    };

    let contents = std::fs::read_to_string(file).map_err(|source| ConfigError::Io {
        path: file.clone(),
        source,
    })?;

    let value: Value = match Path::new(file).extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&contents)?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
        Some("json") => serde_json::from_str(&contents)?,
        Some(ext) => return Err(ConfigError::UnsupportedExtension(ext.to_string())),
        None => return Err(ConfigError::UnsupportedExtension(String::new())),
    };

    if !value.is_object() {
        return Err(ConfigError::NotATable);
    }

    Ok(value)
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn set_env_value(root: &mut Value, path: &[String], raw: String) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }

        current = match current {
            Value::Object(map) => map.entry(segment.clone()).or_insert(Value::Null),
            _ => return,
        };
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }

    if let Value::Object(map) = current {
        let slot = map.entry(last.clone()).or_insert(Value::Null);
        *slot = coerce(slot, raw);
    }
}

/// Env vars are always strings, the default value tells us what type the
/// field wants.
fn coerce(existing: &Value, raw: String) -> Value {
    match existing {
        Value::String(_) => Value::String(raw),
        _ => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
    }
}
