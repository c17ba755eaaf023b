//! Workers AI Client - Cloudflare 平台推理能力
//!
//! REST API:
//! POST {base_url}/accounts/{account_id}/ai/run/{model}
//! Request: {"text": "...", "lang": "zh-CN"}  (JSON, Bearer 认证)
//! Response: 音频二进制，或 JSON 信封 `{"result": {"audio": "<base64>"}}`

use async_trait::async_trait;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::upstream::{ensure_success, non_empty, relay_body, UpstreamClient};
use crate::application::ports::{
    ProviderError, SpeechProviderPort, SynthesisRequest, SynthesizedAudio,
};
use crate::domain::AudioFormat;

/// 模型输入
#[derive(Debug, Serialize)]
struct WorkersAiInput<'a> {
    text: &'a str,
    lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct WorkersAiEnvelope {
    result: WorkersAiResult,
}

#[derive(Debug, Deserialize)]
struct WorkersAiResult {
    audio: String,
}

/// Workers AI 客户端配置
#[derive(Clone)]
pub struct WorkersAiClientConfig {
    pub account_id: Option<String>,
    pub api_token: Option<String>,
    pub base_url: String,
    pub model: String,
    pub default_lang: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub cache_max_age: u64,
}

impl std::fmt::Debug for WorkersAiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkersAiClientConfig")
            .field("account_id", &self.account_id)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("default_lang", &self.default_lang)
            .finish_non_exhaustive()
    }
}

impl Default for WorkersAiClientConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            api_token: None,
            base_url: "https://api.cloudflare.com/client/v4".to_string(),
            model: "@cf/facebook/mms-tts".to_string(),
            default_lang: "zh-CN".to_string(),
            user_agent: format!("voxgate/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
            read_timeout_secs: 30,
            cache_max_age: 86400,
        }
    }
}

impl WorkersAiClientConfig {
    pub fn new(account_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            api_token: Some(api_token.into()),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Workers AI 客户端
pub struct WorkersAiClient {
    client: UpstreamClient,
    config: WorkersAiClientConfig,
}

impl WorkersAiClient {
    pub fn new(config: WorkersAiClientConfig) -> Result<Self, ProviderError> {
        let client = UpstreamClient::new(
            config.timeout_secs,
            config.read_timeout_secs,
            &config.user_agent,
        )?;
        Ok(Self { client, config })
    }

    /// 推理绑定是否可用（账号与令牌均已配置）
    fn binding(&self) -> Result<(&str, &str), ProviderError> {
        match (
            non_empty(&self.config.account_id),
            non_empty(&self.config.api_token),
        ) {
            (Some(account), Some(token)) => Ok((account, token)),
            _ => Err(ProviderError::NotConfigured(
                "Workers AI 未绑定：需要配置 CLOUDFLARE_ACCOUNT_ID 与 CLOUDFLARE_API_TOKEN".to_string(),
            )),
        }
    }

    fn run_url(&self, account_id: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.config.base_url.trim_end_matches('/'),
            account_id,
            self.config.model
        )
    }
}

/// 解析 JSON 信封中的 base64 音频
fn decode_envelope(body: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let envelope: WorkersAiEnvelope = serde_json::from_slice(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("Unexpected Workers AI JSON: {}", e)))?;
    base64::engine::general_purpose::STANDARD
        .decode(envelope.result.audio.trim())
        .map_err(|e| ProviderError::InvalidResponse(format!("Invalid base64 audio: {}", e)))
}

#[async_trait]
impl SpeechProviderPort for WorkersAiClient {
    fn name(&self) -> &'static str {
        "workers_ai"
    }

    fn default_selector(&self) -> &str {
        &self.config.default_lang
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    fn cache_max_age(&self) -> u64 {
        self.config.cache_max_age
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, ProviderError> {
        let (account_id, api_token) = self.binding()?;
        let url = self.run_url(account_id);

        tracing::debug!(
            url = %url,
            model = %self.config.model,
            lang = %request.selector,
            "Sending Workers AI request"
        );

        let run = self.client.post(&url).bearer_auth(api_token).json(&WorkersAiInput {
            text: request.text.as_str(),
            lang: request.selector.as_str(),
        });
        let response = self.client.send("Workers AI", run).await?;

        let response = ensure_success(response).await?;

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let body = response
                .bytes()
                .await
                .map_err(|e| ProviderError::InvalidResponse(format!("Failed to read audio: {}", e)))?;
            let audio = decode_envelope(&body)?;
            tracing::info!(audio_size = audio.len(), "Workers AI inference completed");
            return Ok(SynthesizedAudio::from_bytes(AudioFormat::Wav, audio));
        }

        tracing::info!(
            content_length = ?response.content_length(),
            "Workers AI inference started streaming"
        );
        Ok(SynthesizedAudio::new(AudioFormat::Wav, relay_body(response)))
    }
}
