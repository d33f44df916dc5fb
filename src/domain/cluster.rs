// Cluster, metadata and storage statistics models
use serde::{Deserialize, Serialize};

use super::business::Timestamp;
use super::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterNode {
    #[serde(default, deserialize_with = "lenient::ok_or_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::ok_or_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::ok_or_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::ok_or_none")]
    pub last_active: Option<Timestamp>,
}

impl ClusterNode {
    pub fn is_online(&self) -> bool {
        self.status.as_deref() == Some("online")
    }
}

/// Payload of `GET /cluster`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub leader: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub nodes: Vec<ClusterNode>,
}

impl ClusterInfo {
    pub fn is_online(&self) -> bool {
        self.status.as_deref() == Some("online")
    }
}

/// Payload of `GET /metadata`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataInfo {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub config_count: u64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub business_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessTypeRow {
    pub type_id: String,
    pub name: String,
    pub description: String,
}

impl MetadataInfo {
    pub fn business_type_rows(&self) -> Vec<BusinessTypeRow> {
        self.business_types
            .iter()
            .enumerate()
            .map(|(index, biz_type)| BusinessTypeRow {
                type_id: format!("biz_type_{}", index + 1),
                name: biz_type.clone(),
                description: format!("Data processing module for the {} business type", biz_type),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct StorageStats {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub total_points: u64,
}

/// Payload of `GET /stats`; only the storage block is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct StatsInfo {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub storage: StorageStats,
}
