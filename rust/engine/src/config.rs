//! Analysis configuration: position table, reporting groups and policy.
//!
//! Every TOML section is optional. `[table]` rows override the standard rows
//! of the same size, `[[groups]]` replaces the standard groups.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::errors::ConfigError;
use crate::frequency::RaiseQualificationPolicy;
use crate::positions::{CanonicalPositionTable, Position, PositionGroup, PositionGroups};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisConfig {
    pub table: CanonicalPositionTable,
    pub groups: PositionGroups,
    pub policy: RaiseQualificationPolicy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    policy: Option<RaiseQualificationPolicy>,
    #[serde(default)]
    table: BTreeMap<String, Vec<Position>>,
    groups: Option<Vec<PositionGroup>>,
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let mut config = AnalysisConfig::default();

        if let Some(policy) = raw.policy {
            config.policy = policy;
        }
        for (key, labels) in raw.table {
            let size = key
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid(format!("table size {key:?} is not a number")))?;
            config.table = config.table.with_row(size, labels)?;
        }
        if let Some(groups) = raw.groups {
            validate_groups(&groups)?;
            config.groups = PositionGroups::new(groups);
        }
        Ok(config)
    }
}

/// Record fields that share a JSON object with the group percentages.
const RESERVED_LABELS: [&str; 4] = ["title", "category", "title_header", "table_title"];

fn validate_groups(groups: &[PositionGroup]) -> Result<(), ConfigError> {
    if groups.is_empty() {
        return Err(ConfigError::Invalid("groups list is empty".to_string()));
    }
    let mut labels = HashSet::new();
    for group in groups {
        if group.label.trim().is_empty() {
            return Err(ConfigError::Invalid("group label is empty".to_string()));
        }
        if RESERVED_LABELS.contains(&group.label.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "group label {} is reserved",
                group.label
            )));
        }
        if group.positions.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "group {} has no positions",
                group.label
            )));
        }
        if !labels.insert(group.label.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "group {} is defined twice",
                group.label
            )));
        }
    }
    Ok(())
}
