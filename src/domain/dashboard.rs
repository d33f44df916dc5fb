// Dashboard stat cards
use serde::Serialize;

use super::cluster::{ClusterInfo, MetadataInfo, StatsInfo};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub config_count: u64,
    pub business_count: usize,
    pub total_points: u64,
    /// `None` while the cluster fetch is still outstanding.
    pub cluster_nodes: Option<usize>,
}

impl Dashboard {
    pub fn new(stats: &StatsInfo, metadata: &MetadataInfo) -> Self {
        Self {
            config_count: metadata.config_count,
            business_count: metadata.business_types.len(),
            total_points: stats.storage.total_points,
            cluster_nodes: None,
        }
    }

    pub fn with_cluster(mut self, cluster: &ClusterInfo) -> Self {
        self.cluster_nodes = Some(cluster.nodes.len());
        self
    }
}
