//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, AzureTokenSource, ProviderKind};
use crate::domain::AudioFormat;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 允许的 `Cache-Control: max-age` 范围（秒）
pub const CACHE_MAX_AGE_RANGE: std::ops::RangeInclusive<u64> = 3600..=86400;

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOXGATE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// 凭据字段为空时，再回退到常见的环境变量名
/// （`AZURE_SPEECH_KEY`、`AZURE_SPEECH_REGION`、`CLOUDFLARE_ACCOUNT_ID`、`CLOUDFLARE_API_TOKEN`）。
///
/// # 环境变量示例
/// - `VOXGATE_SERVER__PORT=8080`
/// - `VOXGATE_PROVIDER__KIND=workers_ai`
/// - `VOXGATE_AZURE__SUBSCRIPTION_KEY=...`
/// - `VOXGATE_HTTP__CACHE_MAX_AGE_SECS=3600`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8788)?
        .set_default("provider.kind", "azure")?
        .set_default("provider.timeout_secs", 10)?
        .set_default("provider.read_timeout_secs", 30)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: VOXGATE_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("VOXGATE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 凭据回退
    apply_credential_fallbacks(&mut app_config, |name| std::env::var(name).ok());

    // 7. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 用常见环境变量补齐缺失的凭据
fn apply_credential_fallbacks<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    fn fill<F: Fn(&str) -> Option<String>>(slot: &mut Option<String>, name: &str, lookup: &F) {
        let missing = slot.as_deref().map(str::is_empty).unwrap_or(true);
        if missing {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }
    }

    fill(&mut config.azure.subscription_key, "AZURE_SPEECH_KEY", &lookup);
    fill(&mut config.azure.region, "AZURE_SPEECH_REGION", &lookup);
    fill(&mut config.workers_ai.account_id, "CLOUDFLARE_ACCOUNT_ID", &lookup);
    fill(&mut config.workers_ai.api_token, "CLOUDFLARE_API_TOKEN", &lookup);
}

/// 验证配置有效性
///
/// 凭据缺失不在此报错：服务照常启动，请求时返回配置错误。
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.provider.timeout_secs == 0 || config.provider.read_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Provider timeouts cannot be 0".to_string(),
        ));
    }

    if config.provider.user_agent.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "User agent cannot be empty".to_string(),
        ));
    }

    if let Some(max_age) = config.http.cache_max_age_secs {
        if !CACHE_MAX_AGE_RANGE.contains(&max_age) {
            return Err(ConfigError::ValidationError(format!(
                "Cache max-age must be within {}..={} seconds, got {}",
                CACHE_MAX_AGE_RANGE.start(),
                CACHE_MAX_AGE_RANGE.end(),
                max_age
            )));
        }
    }

    match config.provider.kind {
        ProviderKind::Azure => {
            if AudioFormat::from_azure_output_format(&config.azure.output_format).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "Unsupported Azure output format: {}",
                    config.azure.output_format
                )));
            }
            if config.azure.default_voice.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Azure default voice cannot be empty".to_string(),
                ));
            }
        }
        ProviderKind::WorkersAi => {
            if config.workers_ai.model.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Workers AI model cannot be empty".to_string(),
                ));
            }
            if config.workers_ai.default_lang.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Workers AI default language cannot be empty".to_string(),
                ));
            }
        }
        ProviderKind::GoogleTranslate => {
            if config.google.default_lang.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Google default language cannot be empty".to_string(),
                ));
            }
        }
    }

    Ok(())
}

fn presence(value: &Option<String>) -> &'static str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => "set",
        _ => "MISSING",
    }
}

/// 打印配置信息（用于启动时日志，不输出密钥）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Provider: {}", config.provider.kind.as_str());
    tracing::info!(
        "Provider Timeout: {}s (response), {}s (read stall)",
        config.provider.timeout_secs,
        config.provider.read_timeout_secs
    );
    match config.http.cache_max_age_secs {
        Some(secs) => tracing::info!("Cache Max-Age: {}s", secs),
        None => tracing::info!("Cache Max-Age: provider default"),
    }
    match config.provider.kind {
        ProviderKind::Azure => {
            tracing::info!("Azure Token Source: {:?}", config.azure.token_source);
            if config.azure.token_source == AzureTokenSource::SubscriptionKey {
                tracing::info!("Azure Subscription Key: {}", presence(&config.azure.subscription_key));
                tracing::info!("Azure Region: {}", config.azure.region.as_deref().unwrap_or("MISSING"));
            } else {
                tracing::info!("Azure Token URL: {}", config.azure.token_url.as_deref().unwrap_or("MISSING"));
            }
            tracing::info!("Azure Output Format: {}", config.azure.output_format);
            tracing::info!("Azure Default Voice: {}", config.azure.default_voice);
        }
        ProviderKind::WorkersAi => {
            tracing::info!("Workers AI Account: {}", presence(&config.workers_ai.account_id));
            tracing::info!("Workers AI Token: {}", presence(&config.workers_ai.api_token));
            tracing::info!("Workers AI Model: {}", config.workers_ai.model);
        }
        ProviderKind::GoogleTranslate => {
            tracing::info!("Google TTS URL: {}", config.google.base_url);
        }
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
