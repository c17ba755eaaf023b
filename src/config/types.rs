//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 上游选择与通用请求参数
    #[serde(default)]
    pub provider: ProviderConfig,

    /// 响应头配置
    #[serde(default)]
    pub http: HttpConfig,

    /// Azure Speech 配置
    #[serde(default)]
    pub azure: AzureConfig,

    /// Cloudflare Workers AI 配置
    #[serde(default)]
    pub workers_ai: WorkersAiConfig,

    /// Google Translate TTS 配置
    #[serde(default)]
    pub google: GoogleConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8788
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 上游种类，每个部署只启用一种
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Azure Speech（订阅密钥或公开令牌端点）
    #[default]
    Azure,
    /// Cloudflare Workers AI
    WorkersAi,
    /// Google Translate 朗读接口
    GoogleTranslate,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Azure => "azure",
            Self::WorkersAi => "workers_ai",
            Self::GoogleTranslate => "google_translate",
        }
    }
}

/// 上游通用配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// 选用的上游
    #[serde(default)]
    pub kind: ProviderKind,

    /// 连接并收到响应头的时限（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 转发音频流时单次读取允许的停顿（秒）
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    /// 出站请求的 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("voxgate/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            timeout_secs: default_timeout(),
            read_timeout_secs: default_read_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// 响应头配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// `Cache-Control: max-age`，未设置时使用上游默认值
    #[serde(default)]
    pub cache_max_age_secs: Option<u64>,
}

/// Azure 令牌来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AzureTokenSource {
    /// 订阅密钥换取令牌（issueToken）
    #[default]
    SubscriptionKey,
    /// 公开令牌端点，返回 `{token, region}`
    Public,
}

/// Azure Speech 配置
#[derive(Debug, Clone, Deserialize)]
pub struct AzureConfig {
    #[serde(default)]
    pub token_source: AzureTokenSource,

    /// 订阅密钥
    #[serde(default)]
    pub subscription_key: Option<String>,

    /// 区域，如 `eastasia`
    #[serde(default)]
    pub region: Option<String>,

    /// 公开令牌端点 URL（token_source = public 时必填）
    #[serde(default)]
    pub token_url: Option<String>,

    /// 覆盖 issueToken 地址，默认 `https://{region}.api.cognitive.microsoft.com/sts/v1.0/issueToken`
    #[serde(default)]
    pub token_endpoint: Option<String>,

    /// 覆盖合成地址，默认 `https://{region}.tts.speech.microsoft.com/cognitiveservices/v1`
    #[serde(default)]
    pub tts_endpoint: Option<String>,

    /// X-Microsoft-OutputFormat
    #[serde(default = "default_azure_output_format")]
    pub output_format: String,

    /// 默认音色
    #[serde(default = "default_azure_voice")]
    pub default_voice: String,
}

fn default_azure_output_format() -> String {
    "audio-24khz-48kbitrate-mono-mp3".to_string()
}

fn default_azure_voice() -> String {
    "zh-CN-XiaoxiaoNeural".to_string()
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            token_source: AzureTokenSource::default(),
            subscription_key: None,
            region: None,
            token_url: None,
            token_endpoint: None,
            tts_endpoint: None,
            output_format: default_azure_output_format(),
            default_voice: default_azure_voice(),
        }
    }
}

/// Cloudflare Workers AI 配置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkersAiConfig {
    #[serde(default)]
    pub account_id: Option<String>,

    #[serde(default)]
    pub api_token: Option<String>,

    /// REST API 基础地址
    #[serde(default = "default_workers_ai_base_url")]
    pub base_url: String,

    /// 模型 ID
    #[serde(default = "default_workers_ai_model")]
    pub model: String,

    /// 默认语言
    #[serde(default = "default_lang")]
    pub default_lang: String,
}

fn default_workers_ai_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_workers_ai_model() -> String {
    "@cf/facebook/mms-tts".to_string()
}

fn default_lang() -> String {
    "zh-CN".to_string()
}

impl Default for WorkersAiConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            api_token: None,
            base_url: default_workers_ai_base_url(),
            model: default_workers_ai_model(),
            default_lang: default_lang(),
        }
    }
}

/// Google Translate TTS 配置
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    #[serde(default = "default_google_base_url")]
    pub base_url: String,

    #[serde(default = "default_lang")]
    pub default_lang: String,
}

fn default_google_base_url() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            base_url: default_google_base_url(),
            default_lang: default_lang(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
