//! Rule configuration
//!
//! Configuration arrives as an already-loaded string in JSON, YAML or TOML;
//! locating and merging configuration files is left to the caller.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::diagnostics::Severity;
use crate::order::{CategoryGroup, OrderSpec};
use crate::rules::RuleMetadata;
use crate::{LintelError, Result};

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning
    Warn,
    /// Error
    Error,
}

impl RuleSeverity {
    /// Severity of reported violations, `None` when the rule is off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

/// Per-rule configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Rule severity override
    #[schemars(description = "Override the default severity for this rule")]
    pub severity: Option<RuleSeverity>,

    /// Rule-specific options
    #[schemars(description = "Custom options for this rule")]
    pub options: Option<serde_json::Value>,
}

impl RuleConfig {
    pub fn with_severity(severity: RuleSeverity) -> Self {
        Self {
            severity: Some(severity),
            options: None,
        }
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Decode a single option, `None` when it is absent
    pub fn option<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.options.as_ref().and_then(|options| options.get(key)) else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| LintelError::config_error(format!("invalid option '{key}': {e}")))
    }
}

/// Rules configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesConfiguration {
    /// Enable all available rules, opt-in rules included
    #[schemars(description = "Enable all rules, including opt-in rules")]
    pub all: Option<bool>,

    /// Configuration keyed by rule id (`style/type-contents-order`) or by
    /// its slug (`type-contents-order`)
    #[schemars(description = "Per-rule severity and options")]
    pub rules: HashMap<String, RuleConfig>,
}

impl RulesConfiguration {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| LintelError::config_error(format!("invalid JSON configuration: {e}")))
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_yaml::from_str(input)
            .map_err(|e| LintelError::config_error(format!("invalid YAML configuration: {e}")))
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input)
            .map_err(|e| LintelError::config_error(format!("invalid TOML configuration: {e}")))
    }

    /// Enable every rule
    pub fn all() -> Self {
        Self {
            all: Some(true),
            rules: HashMap::new(),
        }
    }

    pub fn with_rule(mut self, key: impl Into<String>, config: RuleConfig) -> Self {
        self.rules.insert(key.into(), config);
        self
    }

    /// Configuration for a rule, looked up by id first and slug second
    pub fn rule(&self, metadata: &RuleMetadata) -> Option<&RuleConfig> {
        self.rules
            .get(&metadata.id)
            .or_else(|| self.rules.get(metadata.slug()))
    }

    /// Whether the rule should run
    ///
    /// An explicit severity decides; otherwise opt-in rules run only when
    /// `all` is set and every other rule runs.
    pub fn is_enabled(&self, metadata: &RuleMetadata) -> bool {
        match self.rule(metadata).and_then(|config| config.severity) {
            Some(severity) => severity != RuleSeverity::Off,
            None if metadata.opt_in => self.all.unwrap_or(false) || self.rule(metadata).is_some(),
            None => true,
        }
    }

    /// Severity to report with, falling back to the rule's default
    pub fn severity_for(&self, metadata: &RuleMetadata) -> Severity {
        self.rule(metadata)
            .and_then(|config| config.severity)
            .and_then(RuleSeverity::to_severity)
            .unwrap_or(metadata.severity)
    }

    /// Reject keys that name no known rule
    pub fn check_rule_keys(&self, known: &[RuleMetadata]) -> Result<()> {
        for key in self.rules.keys() {
            let matches = known
                .iter()
                .any(|metadata| metadata.id == *key || metadata.slug() == key);
            if !matches {
                return Err(LintelError::config_error(format!("unknown rule '{key}'")));
            }
        }
        Ok(())
    }

    /// JSON Schema describing this configuration
    pub fn json_schema() -> Result<serde_json::Value> {
        let schema = schemars::schema_for!(RulesConfiguration);
        serde_json::to_value(schema)
            .map_err(|e| LintelError::internal_error(format!("schema generation failed: {e}")))
    }
}

/// One entry of an `order` option: a category or a group of categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OrderEntry {
    Single(String),
    Group(Vec<String>),
}

impl OrderEntry {
    pub fn names(&self) -> Vec<&str> {
        match self {
            OrderEntry::Single(name) => vec![name.as_str()],
            OrderEntry::Group(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// Read the `order` option of a rule into an [`OrderSpec`]
///
/// Returns `None` when the option is absent. Names that `parse` does not
/// recognise are a configuration error.
pub fn order_option<C, F>(config: Option<&RuleConfig>, parse: F) -> Result<Option<OrderSpec<C>>>
where
    C: PartialEq,
    F: Fn(&str) -> Option<C>,
{
    let Some(config) = config else {
        return Ok(None);
    };
    let Some(entries) = config.option::<Vec<OrderEntry>>("order")? else {
        return Ok(None);
    };

    let mut groups = Vec::with_capacity(entries.len());
    for entry in &entries {
        let mut categories = Vec::new();
        for name in entry.names() {
            let category = parse(name).ok_or_else(|| {
                LintelError::config_error(format!("unknown category '{name}' in order"))
            })?;
            categories.push(category);
        }
        groups.push(CategoryGroup::new(categories));
    }

    Ok(Some(OrderSpec::new(groups)))
}
