// Configuration records and the form <-> nested object merge engine
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::lenient;
use super::section::UnknownName;

/// Scope a configuration record applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    Business(String),
    System,
    Instance(String),
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKey::Business(biz_type) => write!(f, "business:{}", biz_type),
            ConfigKey::System => f.write_str("system:main"),
            ConfigKey::Instance(id) => write!(f, "instance:{}", id),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("business", biz_type)) if !biz_type.is_empty() => {
                Ok(ConfigKey::Business(biz_type.to_string()))
            }
            Some(("system", "main")) => Ok(ConfigKey::System),
            Some(("instance", id)) if !id.is_empty() => Ok(ConfigKey::Instance(id.to_string())),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

impl Serialize for ConfigKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ConfigKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Body of `POST /config/update`. A `None` value deletes the whole scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigUpdate {
    pub key: ConfigKey,
    pub value: Option<Map<String, Value>>,
}

impl ConfigUpdate {
    pub fn set(key: ConfigKey, value: Map<String, Value>) -> Self {
        Self {
            key,
            value: Some(value),
        }
    }

    pub fn delete(key: ConfigKey) -> Self {
        Self { key, value: None }
    }
}

/// Payload of `GET /config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub business_configs: BTreeMap<String, Map<String, Value>>,
    #[serde(default)]
    pub system_config: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub instance_configs: BTreeMap<String, Map<String, Value>>,
}

/// Builds the nested configuration object from submitted form entries.
///
/// Entries with a blank value are skipped. Each key is split on `.`; the leading
/// segments become nested objects and the last one receives the coerced value.
/// When a shorter and a longer path share a prefix, the entry processed last wins
/// at the level where they conflict.
pub fn flatten_form_to_config<K, V>(entries: &[(K, V)]) -> Map<String, Value>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut root = Map::new();

    for (key, value) in entries {
        let value: &str = value.as_ref();
        if value.trim().is_empty() {
            continue;
        }

        let key: &str = key.as_ref();
        let segments: Vec<&str> = key.split('.').collect();
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for segment in parents {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just replaced by an object"),
            };
        }

        current.insert(leaf.to_string(), coerce_value(value));
    }

    root
}

/// Renders a leaf the way a form input shows it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric strings become JSON numbers; anything else, the literal `null`
/// included, stays the string that was typed.
pub fn coerce_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    match trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(number) if is_plain_decimal(trimmed) => Value::Number(number),
        _ => Value::String(raw.to_string()),
    }
}

// Rust's float parser also accepts "inf" and "NaN"; only digits, sign, dot and exponent count.
fn is_plain_decimal(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}
