//! Configuration for `pseudoloc.toml` and programmatic use.
//!
//! Three layers, outermost first:
//!
//! | Type              | Role                                              |
//! |-------------------|---------------------------------------------------|
//! | [`FileConfig`]    | What `pseudoloc.toml` deserializes into           |
//! | [`LocalizeOptions`] | Caller-facing options handed to a session       |
//! | [`LocalizeConfig`]  | Resolved form the pipeline reads on every call  |
//!
//! CLI flags override file values ([`FileConfig::apply`]); the merged
//! result becomes options, and a session freezes those into a config at
//! start. The config is replaced wholesale on the next start, never
//! patched in place.

mod error;

pub use error::ConfigError;

use std::fs;
use std::path::Path;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::log;
use crate::strategy::{Strategy, StrategyKind};

/// Config file name looked for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pseudoloc.toml";

fn default_blacklist() -> Vec<String> {
    vec!["style".to_string(), "script".to_string()]
}

fn default_attributes() -> Vec<String> {
    vec!["placeholder".to_string()]
}

// ============================================================================
// file configuration
// ============================================================================

/// Root configuration structure representing pseudoloc.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Which built-in transformation to apply.
    pub strategy: StrategyKind,

    /// Tag names whose content is never localized, matched against the
    /// parent of each text node. Case-insensitive.
    pub blacklisted_node_names: Vec<String>,

    /// Attributes localized once per document at activation.
    pub attributes: Vec<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            blacklisted_node_names: default_blacklist(),
            attributes: default_attributes(),
        }
    }
}

impl FileConfig {
    /// Load configuration from a file, warning about unknown fields.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            log!("warning"; "unknown fields in {}, ignoring:", display_path);
            for field in &ignored {
                eprintln!("- {field}");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Apply CLI overrides on top of file values.
    pub fn apply(&mut self, overrides: &Overrides) {
        Self::update_option(&mut self.strategy, overrides.strategy.as_ref());
        Self::update_option(
            &mut self.blacklisted_node_names,
            overrides.blacklisted_node_names.as_ref(),
        );
        Self::update_option(&mut self.attributes, overrides.attributes.as_ref());
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    pub fn into_options(self) -> LocalizeOptions {
        LocalizeOptions {
            strategy: self.strategy.strategy(),
            blacklisted_node_names: self.blacklisted_node_names,
            attributes: self.attributes,
        }
    }
}

/// CLI-provided overrides; `None` means "keep the file value".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub strategy: Option<StrategyKind>,
    pub blacklisted_node_names: Option<Vec<String>>,
    pub attributes: Option<Vec<String>>,
}

// ============================================================================
// session options
// ============================================================================

/// Options handed to [`Session::start`](crate::session::Session::start).
///
/// The defaults mirror an unconfigured `pseudoloc.toml`: accented
/// strategy, style/script denylisted, placeholders localized.
pub struct LocalizeOptions {
    /// The transformation. Any [`Strategy`] works; tests inject
    /// instrumented ones.
    pub strategy: Rc<dyn Strategy>,
    /// Tag names whose content is never localized.
    pub blacklisted_node_names: Vec<String>,
    /// Attributes localized once per document at activation.
    pub attributes: Vec<String>,
}

impl Default for LocalizeOptions {
    fn default() -> Self {
        FileConfig::default().into_options()
    }
}

impl LocalizeOptions {
    /// Defaults with a specific built-in strategy.
    pub fn with_kind(kind: StrategyKind) -> Self {
        Self {
            strategy: kind.strategy(),
            ..Self::default()
        }
    }
}

// ============================================================================
// resolved configuration
// ============================================================================

/// The form the pipeline reads on every localization call.
///
/// Denylist names are lowercased into a set once so the per-node check
/// is a plain lookup.
pub struct LocalizeConfig {
    pub strategy: Rc<dyn Strategy>,
    blacklist: FxHashSet<String>,
    pub attributes: Vec<String>,
}

impl LocalizeConfig {
    pub fn new(options: LocalizeOptions) -> Self {
        let blacklist = options
            .blacklisted_node_names
            .iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        Self {
            strategy: options.strategy,
            blacklist,
            attributes: options.attributes,
        }
    }

    /// Whether content under an element with this tag is excluded.
    pub fn is_blacklisted(&self, tag: &str) -> bool {
        // Tags coming from the tree are already lowercase; anything else
        // pays for normalization.
        self.blacklist.contains(tag)
            || (tag.bytes().any(|b| b.is_ascii_uppercase())
                && self.blacklist.contains(tag.to_ascii_lowercase().as_str()))
    }
}

impl From<LocalizeOptions> for LocalizeConfig {
    fn from(options: LocalizeOptions) -> Self {
        Self::new(options)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.strategy, StrategyKind::Accented);
        assert_eq!(config.blacklisted_node_names, ["style", "script"]);
        assert_eq!(config.attributes, ["placeholder"]);
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let (config, ignored) = FileConfig::parse_with_ignored("strategy = \"bidi\"").unwrap();
        assert!(ignored.is_empty());
        assert_eq!(config.strategy, StrategyKind::Bidi);
        assert_eq!(config.blacklisted_node_names, ["style", "script"]);
    }

    #[test]
    fn test_parse_collects_unknown_fields() {
        let content = "strategy = \"accented\"\ntypo_field = 3\n";
        let (_, ignored) = FileConfig::parse_with_ignored(content).unwrap();
        assert_eq!(ignored, ["typo_field"]);
    }

    #[test]
    fn test_parse_rejects_bad_strategy() {
        assert!(FileConfig::parse_with_ignored("strategy = \"upside\"").is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = FileConfig::default();
        config.apply(&Overrides {
            strategy: Some(StrategyKind::Bidi),
            blacklisted_node_names: None,
            attributes: Some(vec!["title".to_string()]),
        });
        assert_eq!(config.strategy, StrategyKind::Bidi);
        assert_eq!(config.blacklisted_node_names, ["style", "script"]);
        assert_eq!(config.attributes, ["title"]);
    }

    #[test]
    fn test_blacklist_check_ignores_case() {
        let config = LocalizeConfig::new(LocalizeOptions {
            blacklisted_node_names: vec!["STYLE".to_string(), "code".to_string()],
            ..LocalizeOptions::default()
        });
        assert!(config.is_blacklisted("style"));
        assert!(config.is_blacklisted("Style"));
        assert!(config.is_blacklisted("CODE"));
        assert!(!config.is_blacklisted("p"));
    }
}
