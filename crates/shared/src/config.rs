//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, TriggerError};

/// 远端支付 API 的默认地址
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// API 访问配置
///
/// 在引擎构造时一次性提供，整个触发过程中只读。
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 配置档案名，用于选择 `config/<profile>.toml`
    #[serde(default = "default_profile")]
    pub profile: String,
    /// 测试模式密钥（sk_test_...）
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// 为空时不发送版本头，使用账户默认版本
    #[serde(default)]
    pub api_version: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            api_version: String::new(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ApiConfig {
    /// 校验密钥已配置
    ///
    /// 在发出任何请求之前调用，避免用空密钥访问远端。
    pub fn ensure_api_key(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(TriggerError::Config(ConfigError::Message(format!(
                "no API key configured for profile '{}'",
                self.profile
            ))));
        }
        Ok(())
    }

    /// 日志中展示的脱敏密钥
    ///
    /// 按字符而非字节截取，密钥中含多字节字符时不会越过字符边界。
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 是否输出 JSON 格式日志
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. 内置默认值
    /// 2. config/default.toml（默认配置）
    /// 3. config/{profile}.toml（档案特定配置）
    /// 4. 环境变量（TRIGGER_ 前缀，如 TRIGGER_API__API_KEY -> api.api_key）
    pub fn load(profile: &str) -> Result<Self> {
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
        Ok(Self::load_from_dir(profile, &config_dir)?)
    }

    /// 从指定目录加载配置
    pub fn load_from_dir(profile: &str, config_dir: &str) -> std::result::Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("api.profile", profile)?
            // 加载默认配置文件
            .add_source(File::from(Path::new(config_dir).join("default.toml")).required(false))
            // 加载档案特定配置
            .add_source(
                File::from(Path::new(config_dir).join(format!("{}.toml", profile)))
                    .required(false),
            )
            // 字段名本身含下划线，层级分隔符使用双下划线
            .add_source(
                Environment::with_prefix("TRIGGER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.profile, "default");
        assert_eq!(config.api.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.api.api_version.is_empty());
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let config = AppConfig::load_from_dir("staging", "/nonexistent/trigger-config").unwrap();
        assert_eq!(config.api.profile, "staging");
        assert_eq!(config.api.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_load_profile_file_overrides_default() {
        let dir = std::env::temp_dir().join(format!("trigger-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("default.toml"),
            "[api]\napi_base_url = \"http://localhost:12111\"\napi_version = \"2019-03-14\"\n",
        )
        .unwrap();
        std::fs::write(dir.join("ci.toml"), "[api]\napi_version = \"2020-08-27\"\n").unwrap();

        let config = AppConfig::load_from_dir("ci", dir.to_str().unwrap()).unwrap();
        assert_eq!(config.api.api_base_url, "http://localhost:12111");
        assert_eq!(config.api.api_version, "2020-08-27");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_ensure_api_key() {
        let mut api = ApiConfig::default();
        assert!(matches!(
            api.ensure_api_key(),
            Err(TriggerError::Config(_))
        ));

        api.api_key = "sk_test_123456789".to_string();
        assert!(api.ensure_api_key().is_ok());
    }

    #[test]
    fn test_masked_api_key() {
        let api = ApiConfig {
            api_key: "sk_test_abcdefgh1234".to_string(),
            ..Default::default()
        };
        assert_eq!(api.masked_api_key(), "sk_t...1234");

        let short = ApiConfig {
            api_key: "short".to_string(),
            ..Default::default()
        };
        assert_eq!(short.masked_api_key(), "*****");
    }

    #[test]
    fn test_masked_api_key_with_multibyte_chars() {
        let api = ApiConfig {
            api_key: "aééééé".to_string(),
            ..Default::default()
        };
        assert_eq!(api.masked_api_key(), "******");

        let long = ApiConfig {
            api_key: "sk_tést_ééééé_clé1".to_string(),
            ..Default::default()
        };
        assert_eq!(long.masked_api_key(), "sk_t...clé1");
    }
}
