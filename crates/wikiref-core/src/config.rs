use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::syntax::WikiLinkFormat;

/// Link checking configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Check link targets against the project listing
    #[serde(default = "default_true", alias = "validateLinks")]
    pub validate_links: bool,
    /// Wiki links are written `[[text|page]]` instead of `[[page|text]]`
    #[serde(default, alias = "githubWikiLinkFormat")]
    pub github_wiki_link_format: bool,
    /// Class attached to rendered links whose target is missing
    #[serde(
        default = "default_missing_target_class",
        alias = "missingTargetClass"
    )]
    pub missing_target_class: String,
    /// Directory names skipped when listing the project tree
    #[serde(default = "default_ignore_patterns", alias = "ignorePatterns")]
    pub ignore_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_missing_target_class() -> String {
    "absent".to_string()
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".git".to_string(),
        "node_modules".to_string(),
        "target".to_string(),
    ]
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            validate_links: true,
            github_wiki_link_format: false,
            missing_target_class: default_missing_target_class(),
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

impl LinkConfig {
    /// Load config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load config from editor settings (JSON)
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn wiki_link_format(&self) -> WikiLinkFormat {
        if self.github_wiki_link_format {
            WikiLinkFormat::AliasFirst
        } else {
            WikiLinkFormat::TargetFirst
        }
    }
}
