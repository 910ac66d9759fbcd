//! List configuration (`lists.yaml`).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// Free-form options attached to an input or output format.
pub type FormatOptions = BTreeMap<String, serde_yaml::Value>;

/// Top-level configuration: the lists to build.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListsConfig {
    #[serde(default)]
    pub lists: Vec<ListConfig>,
}

/// One output list, assembled from several sources.
#[derive(Debug, Clone, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub name: String,
    /// Deduplication strategy name
    #[serde(default = "default_dedupe")]
    pub dedupe: String,
    #[serde(default)]
    pub output: OutputConfig,
    /// Entries removed from the list after all sources are added
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Output writer selection.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "type", default = "default_output")]
    pub kind: String,
    #[serde(default)]
    pub options: FormatOptions,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            kind: default_output(),
            options: FormatOptions::new(),
        }
    }
}

/// A single list source.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub format_options: FormatOptions,
}

fn default_dedupe() -> String {
    "set".to_string()
}

fn default_output() -> String {
    "hostlist_per_family".to_string()
}

fn default_compression() -> String {
    "none".to_string()
}

fn default_format() -> String {
    "hostlist".to_string()
}

impl ListsConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ListsConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check that every list is named and every source has a URL.
    pub fn validate(&self) -> Result<()> {
        for list in &self.lists {
            if list.name.trim().is_empty() {
                return Err(Error::Config("each list must have a 'name' field".into()));
            }
            for source in &list.sources {
                if source.url.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "list '{}': each source must have a non-empty 'url'",
                        list.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Look up a string option.
pub fn option_str<'a>(options: &'a FormatOptions, key: &str) -> Option<&'a str> {
    options.get(key).and_then(serde_yaml::Value::as_str)
}

/// Look up a boolean option, defaulting to `false`.
pub fn option_bool(options: &FormatOptions, key: &str) -> bool {
    options
        .get(key)
        .and_then(serde_yaml::Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
lists:
  - name: drop
    dedupe: radix
    exclude:
      - 10.0.0.0/8
    sources:
      - url: https://www.spamhaus.org/drop/drop_v4.json
        format: spamhaus-json
      - url: https://example.org/geo.tsv.gz
        compression: gzip
        format: inet-ip-info-geo
        format_options:
          country: cn
  - name: ads
    dedupe: domain
    output:
      type: rpz
      options:
        block_subdomains: true
    sources:
      - url: lists/ads.txt
"#;

    #[test]
    fn test_parse_sample() {
        let config = ListsConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.lists.len(), 2);

        let drop = &config.lists[0];
        assert_eq!(drop.name, "drop");
        assert_eq!(drop.dedupe, "radix");
        assert_eq!(drop.output.kind, "hostlist_per_family");
        assert_eq!(drop.exclude, vec!["10.0.0.0/8"]);
        assert_eq!(drop.sources[0].compression, "none");
        assert_eq!(drop.sources[0].format, "spamhaus-json");
        assert_eq!(drop.sources[1].compression, "gzip");
        assert_eq!(option_str(&drop.sources[1].format_options, "country"), Some("cn"));

        let ads = &config.lists[1];
        assert_eq!(ads.output.kind, "rpz");
        assert!(option_bool(&ads.output.options, "block_subdomains"));
        assert_eq!(ads.sources[0].format, "hostlist");
    }

    #[test]
    fn test_defaults() {
        let config = ListsConfig::from_yaml("lists:\n  - name: plain\n").unwrap();
        let list = &config.lists[0];
        assert_eq!(list.dedupe, "set");
        assert!(list.sources.is_empty());
        assert!(!option_bool(&list.output.options, "block_subdomains"));
    }

    #[test]
    fn test_missing_name_rejected() {
        let err = ListsConfig::from_yaml("lists:\n  - sources: []\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_url_rejected() {
        let yaml = "lists:\n  - name: x\n    sources:\n      - format: hostlist\n";
        assert!(matches!(ListsConfig::from_yaml(yaml), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_document() {
        let config = ListsConfig::from_yaml("{}").unwrap();
        assert!(config.lists.is_empty());
    }
}
