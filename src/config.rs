//! Merge options described by name, loadable from JSON.
//!
//! ```json
//! {
//!   "resolver": "both",
//!   "resolvers": { "mapping": "deep_both" },
//!   "conditions": ["source_is_not_zero"],
//!   "strategies": { "sequence": "append", "record": "replace_fields_shallow" }
//! }
//! ```

use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::MergeError;
use crate::options::MergeOptions;
use crate::resolver::Resolver;
use crate::strategy::SequenceStrategy;
use crate::value::Category;

/// Errors raised while loading an [`OptionsConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("[Smooai Merge] failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    #[error("[Smooai Merge] failed to parse options: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("[Smooai Merge] unknown condition: {0}")]
    UnknownCondition(String),

    #[error("[Smooai Merge] {0}")]
    Options(#[from] MergeError),
}

/// One optional name per structural category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryNames {
    pub record: Option<String>,
    pub sequence: Option<String>,
    pub fixed: Option<String>,
    pub mapping: Option<String>,
    pub stream: Option<String>,
}

/// Serializable form of [`MergeOptions`]. Every field is optional; missing
/// fields keep the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsConfig {
    /// Resolver for the top level and categories without their own.
    pub resolver: Option<String>,
    /// Resolver per category.
    pub resolvers: CategoryNames,
    /// Extra override conditions, by name. `source_is_valid` is always applied.
    pub conditions: Vec<String>,
    /// Strategy per category.
    pub strategies: CategoryNames,
}

impl OptionsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// JSON Schema describing the options document.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(OptionsConfig);
        serde_json::to_value(&schema).unwrap_or_default()
    }

    /// Resolve every name and build the options.
    pub fn build(&self) -> Result<MergeOptions, ConfigError> {
        let mut options = MergeOptions::new();

        if let Some(name) = &self.resolver {
            options = options.with_default_resolver(name.parse::<Resolver>()?);
        }
        let resolvers = &self.resolvers;
        if let Some(name) = &resolvers.record {
            options = options.with_record_resolver(name.parse()?);
        }
        if let Some(name) = &resolvers.sequence {
            options = options.with_sequence_resolver(name.parse()?);
        }
        if let Some(name) = &resolvers.fixed {
            options = options.with_fixed_resolver(name.parse()?);
        }
        if let Some(name) = &resolvers.mapping {
            options = options.with_mapping_resolver(name.parse()?);
        }
        if let Some(name) = &resolvers.stream {
            options = options.with_stream_resolver(name.parse()?);
        }

        for name in &self.conditions {
            let condition = name.parse::<Condition>().map_err(ConfigError::UnknownCondition)?;
            options = options.with_condition(condition);
        }

        let strategies = &self.strategies;
        if let Some(name) = &strategies.record {
            options = options.with_record_strategy(name.parse()?);
        }
        if let Some(name) = &strategies.sequence {
            options = options.with_sequence_strategy(name.parse()?);
        }
        if let Some(name) = &strategies.fixed {
            options = options.with_fixed_strategy(name.parse()?);
        }
        if let Some(name) = &strategies.mapping {
            options = options.with_mapping_strategy(name.parse()?);
        }
        if let Some(name) = &strategies.stream {
            let strategy = SequenceStrategy::parse_for(name, Category::Stream)?;
            options = options.with_stream_strategy(strategy);
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{MappingStrategy, RecordStrategy};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_builds_defaults() {
        let options = OptionsConfig::from_json_str("{}").unwrap().build().unwrap();
        assert_eq!(options.default_resolver(), Resolver::Both);
        assert_eq!(options.sequence_strategy(), SequenceStrategy::ReplaceWhole);
        assert_eq!(options.conditions().len(), 1);
    }

    #[test]
    fn test_names_are_resolved() {
        let config = OptionsConfig::from_json_str(
            r#"{
                "resolver": "single",
                "resolvers": {"mapping": "deep_both"},
                "conditions": ["source_is_not_zero", "types_match"],
                "strategies": {
                    "sequence": "append",
                    "record": "replace_fields_shallow",
                    "mapping": "ignore"
                }
            }"#,
        )
        .unwrap();
        let options = config.build().unwrap();
        assert_eq!(options.default_resolver(), Resolver::Single);
        assert_eq!(options.resolver_for(Category::Mapping), Resolver::DeepBoth);
        assert_eq!(options.resolver_for(Category::Record), Resolver::Single);
        assert_eq!(options.conditions().len(), 3);
        assert_eq!(options.sequence_strategy(), SequenceStrategy::Append);
        assert_eq!(options.record_strategy(), RecordStrategy::ReplaceFieldsShallow);
        assert_eq!(options.mapping_strategy(), MappingStrategy::Ignore);
    }

    #[test]
    fn test_unknown_names_are_reported() {
        let bad_resolver = OptionsConfig {
            resolver: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_resolver.build(),
            Err(ConfigError::Options(MergeError::UnknownResolver(name))) if name == "sideways"
        ));

        let bad_condition = OptionsConfig {
            conditions: vec!["always".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            bad_condition.build(),
            Err(ConfigError::UnknownCondition(name)) if name == "always"
        ));

        let bad_stream = OptionsConfig {
            strategies: CategoryNames {
                stream: Some("refer".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = bad_stream.build().unwrap_err();
        assert_eq!(err.to_string(), "[Smooai Merge] invalid stream strategy: refer");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(matches!(
            OptionsConfig::from_json_str(r#"{"strategy": "append"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"strategies": {{"fixed": "replace_whole"}}}}"#).unwrap();
        let config = OptionsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.strategies.fixed.as_deref(), Some("replace_whole"));
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = OptionsConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_json_schema_lists_fields() {
        let schema = OptionsConfig::json_schema();
        assert_eq!(schema["title"], "OptionsConfig");
        let props = &schema["properties"];
        assert!(props["resolver"].is_object());
        assert!(props["resolvers"].is_object());
        assert!(props["conditions"].is_object());
        assert!(props["strategies"].is_object());
    }

    #[test]
    fn test_round_trips_through_serde() {
        let config = OptionsConfig {
            resolver: Some("deep_single".to_string()),
            conditions: vec!["destination_is_zero".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(OptionsConfig::from_json_str(&json).unwrap(), config);
    }
}
