//! Loader for joblist configuration with file + environment overlays.
//!
//! Sources are merged in the order they are attached; `JOBLIST__`-prefixed
//! environment variables are applied last and win (`JOBLIST__EXTRACT__KEYWORD`
//! maps to `extract.keyword`). String values may reference `${VAR}`
//! placeholders, which are expanded after merging. Every field has a default
//! matching the fake-jobs board, so an empty configuration is valid.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "JOBLIST";
const CONFIG_FILE_NAME: &str = "joblist.yaml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JoblistConfig {
    pub source: SourceConfig,
    pub extract: ExtractConfig,
    pub logging: LoggingConfig,
}

/// Where the page comes from and how patient we are with it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    /// `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub retries: usize,
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "https://realpython.github.io/fake-jobs/".into(),
            timeout_secs: None,
            retries: 0,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive containment: "cpython" matches "python".
    #[default]
    Substring,
    /// Case-insensitive match where the keyword is flanked by non-word
    /// characters or the text edges, so `c++` and `.net` work too.
    WholeWord,
}

/// Selectors and positions used to pull listings out of the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub container_id: String,
    pub heading_selector: String,
    pub keyword: String,
    pub match_mode: MatchMode,
    /// Parent hops from a matched heading to its listing card.
    pub ancestor_depth: usize,
    /// Closest ancestor matching this selector replaces `ancestor_depth`.
    pub card_selector: Option<String>,
    pub title_selector: String,
    pub organization_selector: String,
    pub location_selector: String,
    /// Zero-based index into the card's anchors.
    pub link_index: usize,
    /// First element matching this selector replaces `link_index`.
    pub link_selector: Option<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            container_id: "ResultsContainer".into(),
            heading_selector: "h2".into(),
            keyword: "python".into(),
            match_mode: MatchMode::Substring,
            ancestor_depth: 3,
            card_selector: None,
            title_selector: "h2.title".into(),
            organization_selector: "h3.company".into(),
            location_selector: "p.location".into(),
            link_index: 1,
            link_selector: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub emit_stderr: bool,
    pub dir: Option<PathBuf>,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            emit_stderr: false,
            dir: None,
            filter: "info".into(),
        }
    }
}

/// Candidate config files, lowest precedence first: the user config dir,
/// then the working directory.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("joblist").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    paths
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (files, inline YAML, env overrides).
pub struct JoblistConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for JoblistConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl JoblistConfigLoader {
    /// Start with no sources; defaults fill every field.
    ///
    /// ```
    /// use joblist_config::JoblistConfigLoader;
    ///
    /// let config = JoblistConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.extract.keyword, "python");
    /// assert_eq!(config.extract.ancestor_depth, 3);
    /// assert!(config.source.timeout_secs.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Attach every path from [`default_config_paths`] as optional.
    pub fn with_default_files(self) -> Self {
        default_config_paths()
            .into_iter()
            .fold(self, |loader, path| loader.with_optional_file(path))
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use joblist_config::{JoblistConfigLoader, MatchMode};
    ///
    /// let cfg = JoblistConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// extract:
    ///   keyword: rust
    ///   match_mode: whole_word
    ///   card_selector: div.card
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.extract.keyword, "rust");
    /// assert_eq!(cfg.extract.match_mode, MatchMode::WholeWord);
    /// assert_eq!(cfg.extract.card_selector.as_deref(), Some("div.card"));
    /// assert_eq!(cfg.extract.container_id, "ResultsContainer");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// Environment values stay strings until the final typed pass, where the
    /// `config` deserializer coerces them per field: `JOBLIST__SOURCE__RETRIES=3`
    /// becomes a number while `JOBLIST__EXTRACT__KEYWORD=2024` stays text.
    pub fn load(self) -> Result<JoblistConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let expanded =
            serde_json::to_string(&v).map_err(|e| ConfigError::Message(e.to_string()))?;
        Config::builder()
            .add_source(File::from_str(&expanded, config::FileFormat::Json))
            .build()?
            .try_deserialize()
    }
}
