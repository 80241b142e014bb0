use crate::adapters::{DummyFetcher, HttpFetcher, StdoutSender, TelegramSender};
use crate::domain::ports::{Fetcher, Sender};
use crate::report::formatter::{ComplexFormatter, TemplateFormatter};
use crate::report::registry::{analyzers_by_keys, FormatterRegistry};
use crate::utils::error::{MenuError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "menu-etl.toml";
pub const DEFAULT_LOG_FILE: &str = "menu-log.csv";
pub const DEFAULT_FORMATTER: &str = "SimpleFormatter";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub sender: SenderConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub path: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Dummy,
    Http,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub r#type: SourceType,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    #[default]
    Stdout,
    Telegram,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SenderConfig {
    #[serde(default)]
    pub r#type: SenderType,
    pub api_token: Option<String>,
    #[serde(default)]
    pub chat_ids: Vec<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub default_formatter: Option<String>,
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,
    #[serde(default)]
    pub summaries: Vec<SummaryConfig>,
}

/// A `$` template filled with analyzer results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub name: String,
    pub format: String,
    pub analyzers: Vec<String>,
}

/// One `headline:result` line per analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub name: String,
    pub headlines: Vec<String>,
    pub analyzers: Vec<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MenuError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Loads `path` if given. Without a path the default file is used when it
    /// exists, otherwise the built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    /// 替換環境變數 (例如 ${TELEGRAM_TOKEN})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("log.path", &self.log.path)?;

        if self.source.r#type == SourceType::Http {
            let endpoint = validation::required_text("source.endpoint", &self.source.endpoint)?;
            validation::validate_url("source.endpoint", endpoint)?;
        }
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }

        if self.sender.r#type == SenderType::Telegram {
            validation::required_text("sender.api_token", &self.sender.api_token)?;
            if self.sender.chat_ids.is_empty() {
                return Err(MenuError::MissingConfigError {
                    field: "sender.chat_ids".to_string(),
                });
            }
            if let Some(base_url) = &self.sender.base_url {
                validation::validate_url("sender.base_url", base_url)?;
            }
        }

        for template in &self.report.templates {
            validation::validate_non_empty_string("report.templates.name", &template.name)?;
        }
        for summary in &self.report.summaries {
            validation::validate_non_empty_string("report.summaries.name", &summary.name)?;
        }

        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(&self.log.path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn default_formatter(&self) -> &str {
        self.report
            .default_formatter
            .as_deref()
            .unwrap_or(DEFAULT_FORMATTER)
    }

    /// The dummy source continues the day after `resume_after` (or today).
    pub fn build_fetcher(&self, resume_after: Option<NaiveDate>) -> Result<Box<dyn Fetcher>> {
        match self.source.r#type {
            SourceType::Dummy => {
                let start = resume_after
                    .and_then(|date| date.succ_opt())
                    .unwrap_or_else(|| chrono::Local::now().date_naive());
                Ok(Box::new(DummyFetcher::new(start)))
            }
            SourceType::Http => {
                let endpoint =
                    validation::required_text("source.endpoint", &self.source.endpoint)?;
                Ok(Box::new(HttpFetcher::new(endpoint, self.timeout())))
            }
        }
    }

    pub fn build_sender(&self) -> Result<Box<dyn Sender>> {
        match self.sender.r#type {
            SenderType::Stdout => Ok(Box::new(StdoutSender)),
            SenderType::Telegram => {
                let token =
                    validation::required_text("sender.api_token", &self.sender.api_token)?;
                let client = reqwest::Client::builder().timeout(self.timeout()).build()?;
                Ok(Box::new(TelegramSender::new(
                    client,
                    self.sender
                        .base_url
                        .as_deref()
                        .unwrap_or(TelegramSender::DEFAULT_BASE_URL),
                    token,
                    self.sender.chat_ids.clone(),
                )))
            }
        }
    }

    /// Built-in formatters plus the configured templates and summaries.
    pub fn build_formatter_registry(&self) -> Result<FormatterRegistry> {
        let mut registry = FormatterRegistry::builtin()?;

        for template in &self.report.templates {
            let analyzers = analyzers_by_keys(&template.analyzers)?;
            registry.register(Box::new(TemplateFormatter::new(
                &template.format,
                analyzers,
                template.name.clone(),
            )?))?;
        }
        for summary in &self.report.summaries {
            let analyzers = analyzers_by_keys(&summary.analyzers)?;
            registry.register(Box::new(ComplexFormatter::with_name(
                summary.headlines.clone(),
                analyzers,
                summary.name.clone(),
            )?))?;
        }

        Ok(registry)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
