//! Google Translate TTS Client
//!
//! 公开朗读接口，无需认证:
//! GET https://translate.google.com/translate_tts?ie=UTF-8&client=tw-ob&tl={lang}&q={text}
//! Response: audio/mpeg

use async_trait::async_trait;

use super::upstream::{ensure_success, relay_body, UpstreamClient};
use crate::application::ports::{
    ProviderError, SpeechProviderPort, SynthesisRequest, SynthesizedAudio,
};
use crate::domain::AudioFormat;

/// Google Translate TTS 客户端配置
#[derive(Debug, Clone)]
pub struct GoogleTranslateClientConfig {
    pub base_url: String,
    pub default_lang: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub cache_max_age: u64,
}

impl Default for GoogleTranslateClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com/translate_tts".to_string(),
            default_lang: "zh-CN".to_string(),
            user_agent: format!("voxgate/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
            read_timeout_secs: 30,
            cache_max_age: 3600,
        }
    }
}

impl GoogleTranslateClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Google Translate TTS 客户端
pub struct GoogleTranslateClient {
    client: UpstreamClient,
    config: GoogleTranslateClientConfig,
}

impl GoogleTranslateClient {
    pub fn new(config: GoogleTranslateClientConfig) -> Result<Self, ProviderError> {
        let client = UpstreamClient::new(
            config.timeout_secs,
            config.read_timeout_secs,
            &config.user_agent,
        )?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SpeechProviderPort for GoogleTranslateClient {
    fn name(&self) -> &'static str {
        "google_translate"
    }

    fn default_selector(&self) -> &str {
        &self.config.default_lang
    }

    fn audio_format(&self) -> AudioFormat {
        AudioFormat::Mpeg
    }

    fn cache_max_age(&self) -> u64 {
        self.config.cache_max_age
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, ProviderError> {
        tracing::debug!(
            url = %self.config.base_url,
            lang = %request.selector,
            "Sending Google Translate TTS request"
        );

        let query = self.client.get(&self.config.base_url).query(&[
            ("ie", "UTF-8"),
            ("client", "tw-ob"),
            ("tl", request.selector.as_str()),
            ("q", request.text.as_str()),
        ]);
        let response = self.client.send("Google Translate", query).await?;

        let response = ensure_success(response).await?;

        tracing::info!(
            lang = %request.selector,
            content_length = ?response.content_length(),
            "Google Translate TTS started streaming"
        );

        Ok(SynthesizedAudio::new(AudioFormat::Mpeg, relay_body(response)))
    }
}
