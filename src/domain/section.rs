// Navigable sections and their sub-tabs
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Dashboard,
    Config,
    Metadata,
    Cluster,
    Business,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Config,
        Section::Metadata,
        Section::Cluster,
        Section::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Config => "config",
            Section::Metadata => "metadata",
            Section::Cluster => "cluster",
            Section::Business => "business",
        }
    }
}

impl FromStr for Section {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-tabs of the business section. Every tab but the overview is a paginated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessTab {
    Overview,
    Instances,
    DataViewer,
    Plugins,
}

impl BusinessTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessTab::Overview => "overview",
            BusinessTab::Instances => "instances",
            BusinessTab::DataViewer => "data-viewer",
            BusinessTab::Plugins => "plugins",
        }
    }

    pub fn is_paginated(&self) -> bool {
        !matches!(self, BusinessTab::Overview)
    }
}

impl FromStr for BusinessTab {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(BusinessTab::Overview),
            "instances" => Ok(BusinessTab::Instances),
            "data-viewer" => Ok(BusinessTab::DataViewer),
            "plugins" => Ok(BusinessTab::Plugins),
            other => Err(UnknownName(other.to_string())),
        }
    }
}

/// Sub-tabs of the configuration editor. Switching between them never fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigTab {
    Business,
    System,
    Instance,
}

impl FromStr for ConfigTab {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(ConfigTab::Business),
            "system" => Ok(ConfigTab::System),
            "instance" => Ok(ConfigTab::Instance),
            other => Err(UnknownName(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view name: {0}")]
pub struct UnknownName(pub String);
