// Business instances, plugins and data points
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::filter::Tagged;
use super::lenient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Running,
    Stopped,
    #[default]
    #[serde(other)]
    Unknown,
}

impl InstanceStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, InstanceStatus::Running)
    }
}

/// Point in time as the backend reports it: epoch milliseconds or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Instance entry as listed under `instances` in `GET /business`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InstanceRecord {
    #[serde(rename = "type", default, deserialize_with = "lenient::ok_or_none")]
    pub business_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::ok_or_none")]
    pub status: Option<InstanceStatus>,
    /// Epoch seconds.
    #[serde(default, deserialize_with = "lenient::ok_or_none")]
    pub last_update: Option<i64>,
    #[serde(default, deserialize_with = "lenient::ok_or_none")]
    pub data_points: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessInstance {
    pub id: String,
    pub business_type: Option<String>,
    pub status: InstanceStatus,
    pub last_update: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
    pub data_points: Option<u64>,
}

impl BusinessInstance {
    pub fn from_record(id: String, record: InstanceRecord) -> Self {
        Self {
            id,
            business_type: record.business_type,
            status: record.status.unwrap_or_default(),
            last_update: record.last_update,
            updated_at: record
                .last_update
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            data_points: record.data_points,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub write_rate: f64,
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub query_rate: f64,
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub cache_hit_rate: f64,
}

/// Payload of `GET /business`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BusinessOverview {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub instances: BTreeMap<String, InstanceRecord>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub plugins: Vec<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub performance: Performance,
}

impl BusinessOverview {
    /// Instances ordered by id.
    pub fn instances(&self) -> Vec<BusinessInstance> {
        self.instances
            .iter()
            .map(|(id, record)| BusinessInstance::from_record(id.clone(), record.clone()))
            .collect()
    }

    pub fn summary(&self) -> BusinessSummary {
        BusinessSummary {
            instance_count: self.instances.len(),
            plugin_count: self.plugins.len(),
            performance: self.performance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BusinessSummary {
    pub instance_count: usize,
    pub plugin_count: usize,
    pub performance: Performance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(default, deserialize_with = "lenient::ok_or_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::number_or_zero")]
    pub value: f64,
    #[serde(default, deserialize_with = "lenient::string_tags")]
    pub tags: BTreeMap<String, String>,
}

impl Tagged for DataPoint {
    fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Payload of `GET /business/data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataPointList {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub items: Vec<DataPoint>,
}
