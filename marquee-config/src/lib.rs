//! Loader for run configuration with defaults, YAML and environment overlays.
//!
//! Every setting has a built-in default, so a bare run needs no file at all.
//! Sources are merged in this order, later ones winning:
//!
//! 1. compiled-in defaults (the values below)
//! 2. an optional YAML/TOML/JSON file (`marquee.yaml` for the binary)
//! 3. `MARQUEE_<SECTION>__<KEY>` environment variables
//!
//! String values may reference `${VAR}` placeholders; they are expanded after
//! the merge.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_CHART_URL: &str = "https://www.imdb.com/chart/top/";
pub use marquee_drivers::marquee_browser::options::{DEFAULT_USER_AGENT, DEFAULT_WEBDRIVER_URL};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    pub chart: ChartConfig,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    /// Extract from a saved page snapshot instead of driving a browser.
    pub replay_snapshot: Option<PathBuf>,
}

/// What to fetch and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub url: String,
    /// Unconditional pause after navigation so client-side rendering can finish.
    pub settle_delay_ms: u64,
    /// Upper bound on the wait for each layout's rows to appear.
    pub row_wait_secs: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CHART_URL.into(),
            settle_delay_ms: 4_000,
            row_wait_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
    /// Pause before quitting a visible browser. Ignored when headless.
    pub linger_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.into(),
            headless: false,
            window_width: 1920,
            window_height: 1080,
            user_agent: DEFAULT_USER_AGENT.into(),
            linger_ms: 4_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
    pub snapshot_dir: PathBuf,
    /// Snapshots are written as `<prefix>_<note>.html`.
    pub snapshot_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("imdb_top_250.csv"),
            snapshot_dir: PathBuf::from("."),
            snapshot_prefix: "imdb_page".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormatSetting,
    pub dir: Option<PathBuf>,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormatSetting::Text,
            dir: None,
            stderr: true,
        }
    }
}

impl MarqueeConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.chart.settle_delay_ms)
    }

    pub fn row_wait(&self) -> Duration {
        Duration::from_secs(self.chart.row_wait_secs)
    }

    /// Linger only applies to a visible browser.
    pub fn linger(&self) -> Duration {
        if self.browser.headless {
            Duration::ZERO
        } else {
            Duration::from_millis(self.browser.linger_ms)
        }
    }

    /// Reject settings that would only fail later, mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.chart.url)
            .map_err(|e| ConfigError::Message(format!("chart.url {:?}: {e}", self.chart.url)))?;
        Url::parse(&self.browser.webdriver_url).map_err(|e| {
            ConfigError::Message(format!(
                "browser.webdriver_url {:?}: {e}",
                self.browser.webdriver_url
            ))
        })?;
        if self.chart.row_wait_secs == 0 {
            return Err(ConfigError::Message(
                "chart.row_wait_secs must be greater than zero".into(),
            ));
        }
        if self.output.snapshot_prefix.trim().is_empty() {
            return Err(ConfigError::Message(
                "output.snapshot_prefix must not be empty".into(),
            ));
        }
        Ok(())
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

/// Builder hides the `config` crate wiring (files + env overrides).
pub struct MarqueeConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: &'static str,
}

impl Default for MarqueeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MarqueeConfigLoader {
    /// Start from the compiled-in defaults.
    ///
    /// ```
    /// use marquee_config::{MarqueeConfig, MarqueeConfigLoader};
    ///
    /// let config = MarqueeConfigLoader::new()
    ///     .with_yaml_str("chart:\n  row_wait_secs: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.chart.row_wait_secs, 5);
    /// assert_eq!(config.chart.url, MarqueeConfig::default().chart.url);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "MARQUEE",
        }
    }

    /// Attach a file if it exists; the `config` crate infers format by suffix.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Attach a file that must exist.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests to merge inline YAML snippets.
    ///
    /// ```
    /// use marquee_config::{LogFormatSetting, MarqueeConfigLoader};
    ///
    /// let cfg = MarqueeConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// browser:
    ///   headless: true
    /// logging:
    ///   format: json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(cfg.browser.headless);
    /// assert_eq!(cfg.logging.format, LogFormatSetting::Json);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// Environment variables are layered last, so they override any file.
    pub fn load(self) -> Result<MarqueeConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: MarqueeConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Winston")), ("STATE", Some("NC"))], || {
            let mut v = json!(["out-$CITY", { "dir": "${CITY}-${STATE}" }, 42, true, null]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["out-Winston", { "dir": "Winston-NC" }, 42, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("BAZ", Some("qux")),
                ("BAR", Some("mid-${BAZ}")),
                ("FOO", Some("start-${BAR}-end")),
            ],
            || {
                let mut v = json!("X=${FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn browser_defaults_match_driver_profile() {
        use marquee_drivers::marquee_browser::options::DriverOptions;

        let cfg = BrowserConfig::default();
        let driver = DriverOptions::default();
        assert_eq!(cfg.user_agent, driver.profile.user_agent);
        assert_eq!(cfg.webdriver_url, driver.webdriver_url);
    }

    #[test]
    fn linger_is_zero_when_headless() {
        let mut cfg = MarqueeConfig::default();
        assert_eq!(cfg.linger(), Duration::from_secs(4));
        cfg.browser.headless = true;
        assert_eq!(cfg.linger(), Duration::ZERO);
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut cfg = MarqueeConfig::default();
        cfg.chart.url = "not a url".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_wait() {
        let mut cfg = MarqueeConfig::default();
        cfg.chart.row_wait_secs = 0;
        assert!(cfg.validate().is_err());
    }
}
