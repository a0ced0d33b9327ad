//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. YAML files added with [`GistConfigLoader::with_file`] or
//!    [`GistConfigLoader::with_optional_file`], then inline snippets from
//!    [`GistConfigLoader::with_yaml_str`];
//! 2. `GIST__`-prefixed environment variables, `__` separating nesting levels
//!    (`GIST__PROVIDERS__RAPIDAPI_KEY`, `GIST__HISTORY__MAX_ENTRIES`).
//!
//! Every string value is then `${VAR}`-expanded. Credentials that stay empty
//! or still hold an unresolved `${...}` placeholder count as not configured.
use config::{Config, ConfigError, Environment, File};
use gist_common::SummaryStyle;
use gist_common::observability::{LogConfig, LogFormat};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_ARTICLE_API: &str = "https://article-extractor-and-summarizer.p.rapidapi.com/";
pub const DEFAULT_CHAT_API: &str = "https://open-ai21.p.rapidapi.com/";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_HISTORY_ENTRIES: usize = 20;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GistConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider endpoints and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    /// Primary credential; gates chat completion and enrichment.
    #[serde(default)]
    pub rapidapi_key: Option<String>,
    #[serde(default = "default_article_api")]
    pub article_api: EndpointConfig,
    #[serde(default = "default_chat_api")]
    pub chat_api: EndpointConfig,
    /// Optional secondary completion provider.
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
    #[serde(default = "default_timeout_secs", deserialize_with = "lenient_u64")]
    pub timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            rapidapi_key: None,
            article_api: default_article_api(),
            chat_api: default_chat_api(),
            openai: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProvidersConfig {
    /// The primary credential, if it is really set.
    pub fn rapidapi_key(&self) -> Option<&str> {
        credential(self.rapidapi_key.as_deref())
    }

    /// The secondary provider, if its credential is really set.
    pub fn openai(&self) -> Option<&OpenAiConfig> {
        self.openai
            .as_ref()
            .filter(|o| credential(Some(o.api_key.as_str())).is_some())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
    /// Value of the host-identifying header; defaults to the host of `base_url`.
    #[serde(default)]
    pub host: Option<String>,
}

impl EndpointConfig {
    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| {
            url::Url::parse(&self.base_url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_default()
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub style: SummaryStyle,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            style: SummaryStyle::default(),
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// History file; the front end picks a data-dir default when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_history_entries", deserialize_with = "lenient_usize")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_entries: DEFAULT_HISTORY_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub stderr: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_filter(),
            stderr: false,
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
            ..LogConfig::default()
        }
    }
}

fn default_article_api() -> EndpointConfig {
    EndpointConfig {
        base_url: DEFAULT_ARTICLE_API.into(),
        host: None,
    }
}
fn default_chat_api() -> EndpointConfig {
    EndpointConfig {
        base_url: DEFAULT_CHAT_API.into(),
        host: None,
    }
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_openai_endpoint() -> String {
    DEFAULT_OPENAI_ENDPOINT.into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_language() -> String {
    gist_common::DEFAULT_LANGUAGE.into()
}
fn default_history_entries() -> usize {
    DEFAULT_HISTORY_ENTRIES
}
fn default_filter() -> String {
    "info".into()
}

/// Empty strings and unresolved `${VAR}` placeholders are not credentials.
pub fn credential(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && !s.contains("${"))
}

// Environment overrides arrive as strings, YAML as native scalars.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(u64),
    Str(String),
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match Scalar::deserialize(d)? {
        Scalar::Int(n) => Ok(n),
        Scalar::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Scalar::Bool(_) => Err(serde::de::Error::custom("expected a number")),
    }
}

fn lenient_usize<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    let n = lenient_u64(d)?;
    usize::try_from(n).map_err(serde::de::Error::custom)
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    match Scalar::deserialize(d)? {
        Scalar::Bool(b) => Ok(b),
        Scalar::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("expected a bool, got '{other}'"))),
        },
        Scalar::Int(n) => Ok(n != 0),
    }
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

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct GistConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for GistConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GistConfigLoader {
    /// Start with no files; `GIST__` env overrides are applied at [`load`](Self::load).
    ///
    /// ```
    /// use gist_config::GistConfigLoader;
    ///
    /// let config = GistConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.history.max_entries, 20);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "GIST".into(),
        }
    }

    /// Use a different environment prefix (tests isolate themselves this way).
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use gist_common::SummaryStyle;
    /// use gist_config::GistConfigLoader;
    ///
    /// let cfg = GistConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// defaults:
    ///   style: bulletpoints
    ///   language: fr
    /// providers:
    ///   chat_api:
    ///     base_url: "http://localhost:8080/"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.defaults.style, SummaryStyle::BulletPoints);
    /// assert_eq!(cfg.defaults.language, "fr");
    /// assert_eq!(cfg.providers.chat_api.host(), "localhost");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use gist_config::GistConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_RAPID_KEY", "injected-from-env"); }
    ///
    /// let config = GistConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// providers:
    ///   rapidapi_key: "${DOC_RAPID_KEY}"
    ///   openai:
    ///     api_key: "${DOC_UNSET_OPENAI_KEY}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.providers.rapidapi_key(), Some("injected-from-env"));
    /// assert!(config.providers.openai().is_none());
    ///
    /// unsafe { std::env::remove_var("DOC_RAPID_KEY"); }
    /// ```
    pub fn load(self) -> Result<GistConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix(&self.env_prefix).separator("__"))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);
        if v.is_null() {
            v = Value::Object(Default::default());
        }

        let typed: GistConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        tracing::debug!(
            version=?typed.version,
            has_rapidapi_key=typed.providers.rapidapi_key().is_some(),
            has_openai=typed.providers.openai().is_some(),
            "config.loaded"
        );
        Ok(typed)
    }
}
