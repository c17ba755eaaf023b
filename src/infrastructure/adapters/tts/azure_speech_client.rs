//! Azure Speech Client - 认知服务语音合成
//!
//! 流程：令牌交换 -> SSML 合成请求 -> 音频流原样转发
//!
//! 合成 API:
//! POST https://{region}.tts.speech.microsoft.com/cognitiveservices/v1
//! Headers: Authorization: Bearer <token>, Content-Type: application/ssml+xml,
//!          X-Microsoft-OutputFormat: <format>, User-Agent: <client>
//! Response: 音频二进制

use async_trait::async_trait;

use super::azure_token::{IssuedToken, TokenSource};
use super::upstream::{ensure_success, non_empty, relay_body, UpstreamClient};
use crate::application::ports::{
    ProviderError, SpeechProviderPort, SynthesisRequest, SynthesizedAudio,
};
use crate::domain::{build_ssml, AudioFormat};

/// Azure Speech 客户端配置
#[derive(Debug, Clone)]
pub struct AzureSpeechClientConfig {
    pub token_source: TokenSource,
    /// 覆盖合成地址；未设置时由令牌区域推导
    pub tts_endpoint: Option<String>,
    /// X-Microsoft-OutputFormat
    pub output_format: String,
    pub default_voice: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// 音频流单次读取允许的最长停顿
    pub read_timeout_secs: u64,
    pub cache_max_age: u64,
}

impl AzureSpeechClientConfig {
    pub fn new(token_source: TokenSource) -> Self {
        Self {
            token_source,
            tts_endpoint: None,
            output_format: "audio-24khz-48kbitrate-mono-mp3".to_string(),
            default_voice: "zh-CN-XiaoxiaoNeural".to_string(),
            user_agent: format!("voxgate/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
            read_timeout_secs: 30,
            cache_max_age: 86400,
        }
    }

    pub fn with_tts_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.tts_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_output_format(mut self, output_format: impl Into<String>) -> Self {
        self.output_format = output_format.into();
        self
    }
}

/// Azure Speech 客户端
pub struct AzureSpeechClient {
    client: UpstreamClient,
    config: AzureSpeechClientConfig,
    format: AudioFormat,
}

impl AzureSpeechClient {
    pub fn new(config: AzureSpeechClientConfig) -> Result<Self, ProviderError> {
        let format = AudioFormat::from_azure_output_format(&config.output_format).ok_or_else(
            || {
                ProviderError::NotConfigured(format!(
                    "Unsupported Azure output format: {}",
                    config.output_format
                ))
            },
        )?;
        let client = UpstreamClient::new(
            config.timeout_secs,
            config.read_timeout_secs,
            &config.user_agent,
        )?;

        Ok(Self {
            client,
            config,
            format,
        })
    }

    /// 合成地址：配置覆盖优先，其次令牌所属区域
    fn tts_url(&self, token: Option<&IssuedToken>) -> Result<String, ProviderError> {
        if let Some(endpoint) = non_empty(&self.config.tts_endpoint) {
            return Ok(endpoint.to_string());
        }
        let region = token
            .and_then(|t| t.region.as_deref())
            .or_else(|| self.config.token_source.configured_region())
            .ok_or_else(|| {
                ProviderError::NotConfigured(
                    "Cannot derive Azure synthesis endpoint without a region".to_string(),
                )
            })?;
        Ok(format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            region
        ))
    }

    /// 发出任何请求前的配置检查
    fn precheck(&self) -> Result<(), ProviderError> {
        self.config.token_source.ensure_configured()?;
        if let TokenSource::SubscriptionKey { .. } = self.config.token_source {
            self.tts_url(None)?;
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechProviderPort for AzureSpeechClient {
    fn name(&self) -> &'static str {
        "azure"
    }

    fn default_selector(&self) -> &str {
        &self.config.default_voice
    }

    fn audio_format(&self) -> AudioFormat {
        self.format
    }

    fn cache_max_age(&self) -> u64 {
        self.config.cache_max_age
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, ProviderError> {
        self.precheck()?;

        let token = self.config.token_source.issue(&self.client).await?;
        let url = self.tts_url(Some(&token))?;
        let ssml = build_ssml(&request.text, &request.selector);

        tracing::debug!(
            url = %url,
            voice = %request.selector,
            ssml_len = ssml.len(),
            output_format = %self.config.output_format,
            "Sending Azure synthesis request"
        );

        let synthesis = self
            .client
            .post(&url)
            .bearer_auth(&token.value)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &self.config.output_format)
            .body(ssml);
        let response = self.client.send("Azure speech service", synthesis).await?;

        let response = ensure_success(response).await?;

        tracing::info!(
            voice = %request.selector,
            content_length = ?response.content_length(),
            "Azure synthesis started streaming"
        );

        Ok(SynthesizedAudio::new(self.format, relay_body(response)))
    }
}
