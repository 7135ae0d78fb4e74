// SPDX-License-Identifier: PMPL-1.0-or-later

//! Check configuration
//!
//! Read from `ts-linguist.yaml` in the working directory, or from the file
//! passed with `--config`. Every field is optional:
//!
//! ```yaml
//! disabled_rules: [identical-translation]
//! severity_overrides:
//!   unfinished-translation: medium
//!   TS008: high
//! fail_on: high
//! min_completion: 80
//! ignore_contexts: [QObject]
//! identical_allowlist: [OK, Subsurface, divelogs.de]
//! ```

use crate::types::{Rule, Severity};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "ts-linguist.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rule ids (`TS010`) or names (`identical-translation`)
    pub disabled_rules: Vec<String>,
    pub severity_overrides: HashMap<String, Severity>,
    /// Lowest severity that fails a check run
    pub fail_on: Severity,
    /// Minimum completion percentage per catalog
    pub min_completion: Option<f64>,
    pub ignore_contexts: Vec<String>,
    /// Sources allowed to stay identical to their translation
    pub identical_allowlist: Vec<String>,
    /// Locale whose plural rules apply, overriding the catalog's `language`
    pub language: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disabled_rules: Vec::new(),
            severity_overrides: HashMap::new(),
            fail_on: Severity::High,
            min_completion: None,
            ignore_contexts: Vec::new(),
            identical_allowlist: Vec::new(),
            language: None,
        }
    }
}

impl Config {
    /// Load `explicit` if given (it must exist), otherwise the default file
    /// in the working directory if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.warn_unknown_rules();
        Ok(config)
    }

    fn warn_unknown_rules(&self) {
        let names = self
            .disabled_rules
            .iter()
            .chain(self.severity_overrides.keys());
        for name in names {
            if Rule::parse(name).is_none() {
                warn!(rule = %name, "unknown rule in config");
            }
        }
    }

    pub fn is_enabled(&self, rule: Rule) -> bool {
        !self
            .disabled_rules
            .iter()
            .any(|name| Rule::parse(name) == Some(rule))
    }

    pub fn severity(&self, rule: Rule) -> Severity {
        self.severity_overrides
            .iter()
            .find(|(name, _)| Rule::parse(name) == Some(rule))
            .map(|(_, severity)| *severity)
            .unwrap_or_else(|| rule.default_severity())
    }

    pub fn ignores_context(&self, context: &str) -> bool {
        self.ignore_contexts.iter().any(|c| c == context)
    }

    pub fn allows_identical(&self, source: &str) -> bool {
        self.identical_allowlist.iter().any(|s| s == source)
    }
}
