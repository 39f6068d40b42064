//! Layered CLI configuration: defaults, then the TOML file named by
//! `HANDSCOPE_CONFIG`, then single-value environment overrides.

use handscope_engine::errors::ConfigError as AnalysisConfigError;
use handscope_engine::{AnalysisConfig, Filters, RaiseQualificationPolicy};
use serde::Serialize;
use std::fs;

pub const CONFIG_ENV: &str = "HANDSCOPE_CONFIG";
pub const POLICY_ENV: &str = "HANDSCOPE_POLICY";
pub const MIN_SEAT_ENV: &str = "HANDSCOPE_MIN_SEAT";
pub const MAX_SEAT_ENV: &str = "HANDSCOPE_MAX_SEAT";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub analysis: AnalysisConfig,
    /// Starting point for `rfi` filters not given on the command line
    pub filters: Filters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub policy: ValueSource,
    pub table: ValueSource,
    pub groups: ValueSource,
    pub min_seat: ValueSource,
    pub max_seat: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            policy: ValueSource::Default,
            table: ValueSource::Default,
            groups: ValueSource::Default,
            min_seat: ValueSource::Default,
            max_seat: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
    /// The file that was read, if any
    pub path: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Analysis(AnalysisConfigError),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<AnalysisConfigError> for ConfigError {
    fn from(e: AnalysisConfigError) -> Self {
        ConfigError::Analysis(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read {}: {}", CONFIG_ENV, e),
            ConfigError::Parse(e) => write!(f, "malformed TOML: {}", e),
            ConfigError::Analysis(e) => write!(f, "{}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    resolve(|key| std::env::var(key).ok())
}

/// Resolves the configuration against an arbitrary variable lookup.
fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();
    let mut path = None;

    if let Some(file) = lookup(CONFIG_ENV).filter(|p| !p.is_empty()) {
        let text = fs::read_to_string(&file)?;
        let sections: toml::Table = toml::from_str(&text)?;
        cfg.analysis = AnalysisConfig::from_toml_str(&text)?;
        if sections.contains_key("policy") {
            sources.policy = ValueSource::File;
        }
        if sections.contains_key("table") {
            sources.table = ValueSource::File;
        }
        if sections.contains_key("groups") {
            sources.groups = ValueSource::File;
        }
        path = Some(file);
    }

    if let Some(name) = lookup(POLICY_ENV).filter(|v| !v.is_empty()) {
        cfg.analysis.policy = RaiseQualificationPolicy::preset(&name).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Invalid policy {:?}: expected open-raise or shove",
                name
            ))
        })?;
        sources.policy = ValueSource::Env;
    }
    if let Some(seat) = lookup(MIN_SEAT_ENV).filter(|v| !v.is_empty()) {
        cfg.filters.min_seat = parse_seat(MIN_SEAT_ENV, &seat)?;
        sources.min_seat = ValueSource::Env;
    }
    if let Some(seat) = lookup(MAX_SEAT_ENV).filter(|v| !v.is_empty()) {
        cfg.filters.max_seat = parse_seat(MAX_SEAT_ENV, &seat)?;
        sources.max_seat = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
        path,
    })
}

fn parse_seat(var: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {:?}", var, value)))
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.filters.min_seat > cfg.filters.max_seat {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: min_seat {} exceeds max_seat {}",
            cfg.filters.min_seat, cfg.filters.max_seat
        )));
    }
    Ok(())
}
