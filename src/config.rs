use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::Language;
use crate::session::{DEFAULT_DURATION_SECS, LOW_TIME_THRESHOLD_SECS};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库服务地址（包含 `/api` 前缀）
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 计时测试的总时长（秒）
    pub test_duration_secs: u32,
    /// 剩余时间低于该值时进入"时间紧张"显示
    pub low_time_threshold_secs: u32,
    /// 倒计时间隔（毫秒）
    pub tick_interval_ms: u64,
    /// 题目显示语言
    pub language: Language,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 成绩报告追加写入的文件，不设置则不写
    pub report_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: 30,
            test_duration_secs: DEFAULT_DURATION_SECS,
            low_time_threshold_secs: LOW_TIME_THRESHOLD_SECS,
            tick_interval_ms: 1000,
            language: Language::Ar,
            verbose_logging: false,
            report_file: None,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env()
    }

    /// 从 TOML 文件读取配置，文件里缺失的项使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()
    }

    /// 用环境变量覆盖当前配置
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            test_duration_secs: env_parse("TEST_DURATION_SECS", "u32")?
                .unwrap_or(self.test_duration_secs),
            low_time_threshold_secs: env_parse("LOW_TIME_THRESHOLD_SECS", "u32")?
                .unwrap_or(self.low_time_threshold_secs),
            tick_interval_ms: env_parse("TICK_INTERVAL_MS", "u64")?
                .unwrap_or(self.tick_interval_ms),
            language: env_parse("EXAM_LANGUAGE", "ar|en|sv")?.unwrap_or(self.language),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            report_file: std::env::var("REPORT_FILE").ok().or(self.report_file),
        }
        .validate()
    }

    /// 时长和间隔必须大于 0
    pub fn validate(self) -> Result<Self, ConfigError> {
        let positive = [
            ("request_timeout_secs", self.request_timeout_secs),
            ("test_duration_secs", u64::from(self.test_duration_secs)),
            ("tick_interval_ms", self.tick_interval_ms),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::NotPositive { key });
            }
        }
        Ok(self)
    }

    /// 倒计时间隔
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

fn env_parse<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
