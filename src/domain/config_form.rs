// Editable form descriptors for every configuration scope
use serde::Serialize;
use serde_json::{Map, Value};

use super::config_record::{ConfigKey, ConsoleConfig, display_value};

pub const COMPRESSION_OPTIONS: [&str; 3] = ["lz4", "snappy", "none"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextArea,
    Number { min: Option<i64>, max: Option<i64> },
    Select { options: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    /// Dotted path the value is merged back under.
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigForm {
    pub key: ConfigKey,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
    pub deletable: bool,
}

impl ConfigForm {
    /// Replaces prefilled values with a previously submitted draft.
    pub fn with_draft(mut self, draft: &[(String, String)]) -> Self {
        for field in &mut self.fields {
            if let Some((_, value)) = draft.iter().find(|(name, _)| *name == field.name) {
                field.value = value.clone();
            }
        }
        self
    }
}

pub fn business_forms(config: &ConsoleConfig) -> Vec<ConfigForm> {
    config
        .business_configs
        .iter()
        .map(|(biz_type, values)| {
            let name = lookup(values, "name").unwrap_or_else(|| biz_type.clone());
            let compression = lookup(values, "compression").unwrap_or_else(|| "none".to_string());
            ConfigForm {
                key: ConfigKey::Business(biz_type.clone()),
                title: name.clone(),
                description: lookup(values, "description"),
                fields: vec![
                    field("name", "Business name", FieldKind::Text, name),
                    field(
                        "description",
                        "Description",
                        FieldKind::TextArea,
                        lookup(values, "description").unwrap_or_default(),
                    ),
                    field(
                        "block_size",
                        "Block size (seconds)",
                        number(Some(1), None),
                        lookup(values, "block_size").unwrap_or_else(|| "60".to_string()),
                    ),
                    field(
                        "retention_days",
                        "Retention (days)",
                        number(Some(1), None),
                        lookup(values, "retention_days").unwrap_or_else(|| "30".to_string()),
                    ),
                    field(
                        "compression",
                        "Compression",
                        FieldKind::Select {
                            options: COMPRESSION_OPTIONS.iter().map(|o| o.to_string()).collect(),
                        },
                        compression,
                    ),
                ],
                deletable: false,
            }
        })
        .collect()
}

pub fn system_form(config: &ConsoleConfig) -> Option<ConfigForm> {
    let values = config.system_config.as_ref()?;
    let value_or = |path: &str, default: &str| lookup(values, path).unwrap_or_else(|| default.to_string());

    Some(ConfigForm {
        key: ConfigKey::System,
        title: "System".to_string(),
        description: None,
        fields: vec![
            field("server.port", "Port", number(Some(1), Some(65535)), value_or("server.port", "6379")),
            field("server.bind", "Bind address", FieldKind::Text, value_or("server.bind", "0.0.0.0")),
            field(
                "server.max_connections",
                "Max connections",
                number(Some(1), None),
                value_or("server.max_connections", "10000"),
            ),
            field("storage.data_dir", "Data directory", FieldKind::Text, value_or("storage.data_dir", "./data")),
            field(
                "storage.write_buffer_size",
                "Write buffer size (bytes)",
                number(Some(1), None),
                value_or("storage.write_buffer_size", "67108864"),
            ),
        ],
        deletable: false,
    })
}

pub fn instance_forms(config: &ConsoleConfig) -> Vec<ConfigForm> {
    config
        .instance_configs
        .iter()
        .map(|(instance_id, values)| ConfigForm {
            key: ConfigKey::Instance(instance_id.clone()),
            title: format!("Instance: {}", instance_id),
            description: None,
            fields: vec![
                field(
                    "name",
                    "Instance name",
                    FieldKind::Text,
                    lookup(values, "name").unwrap_or_else(|| instance_id.clone()),
                ),
                field(
                    "business_type",
                    "Business type",
                    FieldKind::Text,
                    lookup(values, "business_type").unwrap_or_default(),
                ),
                field("node_id", "Node ID", FieldKind::Text, lookup(values, "node_id").unwrap_or_default()),
            ],
            deletable: true,
        })
        .collect()
}

// Falsy values (missing, null, empty string, zero) fall back to the field default.
fn lookup(values: &Map<String, Value>, path: &str) -> Option<String> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = values.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    match current {
        Value::Null | Value::Object(_) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(display_value(other)),
    }
}

fn field(name: &str, label: &str, kind: FieldKind, value: String) -> FormField {
    FormField {
        name: name.to_string(),
        label: label.to_string(),
        kind,
        value,
    }
}

fn number(min: Option<i64>, max: Option<i64>) -> FieldKind {
    FieldKind::Number { min, max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn console_config(raw: Value) -> ConsoleConfig {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_business_form_defaults() {
        let config = console_config(json!({
            "business_configs": {"stock": {"name": "Stock quotes", "retention_days": 90}}
        }));

        let forms = business_forms(&config);
        assert_eq!(forms.len(), 1);
        let form = &forms[0];
        assert_eq!(form.key.to_string(), "business:stock");
        assert_eq!(form.title, "Stock quotes");

        let values: Vec<(&str, &str)> = form
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("name", "Stock quotes"),
                ("description", ""),
                ("block_size", "60"),
                ("retention_days", "90"),
                ("compression", "none"),
            ]
        );
    }

    #[test]
    fn test_system_form_reads_nested_values() {
        let config = console_config(json!({
            "system_config": {"server": {"port": 6380}, "storage": {"data_dir": "/var/tsdb"}}
        }));

        let form = system_form(&config).unwrap();
        assert_eq!(form.fields[0].value, "6380");
        assert_eq!(form.fields[1].value, "0.0.0.0");
        assert_eq!(form.fields[3].value, "/var/tsdb");
        assert_eq!(form.fields[4].value, "67108864");

        assert!(system_form(&ConsoleConfig::default()).is_none());
    }

    #[test]
    fn test_instance_form_uses_id_as_default_name() {
        let config = console_config(json!({
            "instance_configs": {"db-01": {"business_type": "stock"}}
        }));

        let forms = instance_forms(&config);
        assert_eq!(forms[0].fields[0].value, "db-01");
        assert_eq!(forms[0].fields[1].value, "stock");
        assert!(forms[0].deletable);
    }

    #[test]
    fn test_draft_overrides_prefilled_values() {
        let config = console_config(json!({"system_config": {}}));
        let draft = vec![("server.port".to_string(), "7000".to_string())];

        let form = system_form(&config).unwrap().with_draft(&draft);
        assert_eq!(form.fields[0].value, "7000");
        assert_eq!(form.fields[1].value, "0.0.0.0");
    }
}
