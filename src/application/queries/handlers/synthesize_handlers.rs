//! Synthesize Query Handler

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{SpeechProviderPort, SynthesisRequest};
use crate::application::queries::synthesize_queries::{SynthesizeQuery, SynthesizeResponse};
use crate::domain::{SynthesisText, VoiceSelector};

/// Synthesize Handler - 校验参数并转发到当前上游
pub struct SynthesizeHandler {
    provider: Arc<dyn SpeechProviderPort>,
    cache_max_age: u64,
}

impl SynthesizeHandler {
    /// `cache_max_age` 为 None 时使用上游自身的缓存时长
    pub fn new(provider: Arc<dyn SpeechProviderPort>, cache_max_age: Option<u64>) -> Self {
        let cache_max_age = cache_max_age.unwrap_or_else(|| provider.cache_max_age());
        Self {
            provider,
            cache_max_age,
        }
    }

    pub async fn handle(
        &self,
        query: SynthesizeQuery,
    ) -> Result<SynthesizeResponse, ApplicationError> {
        // 先校验，校验失败不触达上游
        let text = SynthesisText::new(query.text.unwrap_or_default())?;

        let selector = match query.selector.filter(|s| !s.trim().is_empty()) {
            Some(selector) => VoiceSelector::new(selector)?,
            None => VoiceSelector::new(self.provider.default_selector()).map_err(|_| {
                ApplicationError::configuration(format!(
                    "Provider {} has no default voice",
                    self.provider.name()
                ))
            })?,
        };

        tracing::info!(
            provider = self.provider.name(),
            selector = %selector,
            text_chars = text.char_count(),
            "Synthesizing speech"
        );

        let audio = self
            .provider
            .synthesize(SynthesisRequest { text, selector })
            .await?;

        Ok(SynthesizeResponse {
            content_type: audio.format.mime_type(),
            body: audio.body,
            cache_max_age: self.cache_max_age,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ProviderError;
    use crate::application::ports::SynthesizedAudio;
    use crate::domain::AudioFormat;
    use crate::infrastructure::adapters::{FakeTtsClient, FakeTtsClientConfig};

    fn fake() -> Arc<FakeTtsClient> {
        Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            audio_data: b"RIFF-fake".to_vec(),
            format: AudioFormat::Wav,
            default_selector: "zh-CN".to_string(),
            cache_max_age: 86400,
        }))
    }

    fn query(text: Option<&str>, selector: Option<&str>) -> SynthesizeQuery {
        SynthesizeQuery {
            text: text.map(str::to_string),
            selector: selector.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_missing_text_never_reaches_provider() {
        let provider = fake();
        let handler = SynthesizeHandler::new(provider.clone(), None);

        for q in [query(None, None), query(Some(""), Some("en-US")), query(Some("  "), None)] {
            let err = handler.handle(q).await.unwrap_err();
            assert!(matches!(err, ApplicationError::MissingInput(_)));
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_default_selector_applied() {
        let provider = fake();
        let handler = SynthesizeHandler::new(provider.clone(), None);

        handler.handle(query(Some("你好"), None)).await.unwrap();
        assert_eq!(provider.last_selector().as_deref(), Some("zh-CN"));

        handler.handle(query(Some("你好"), Some(" "))).await.unwrap();
        assert_eq!(provider.last_selector().as_deref(), Some("zh-CN"));
    }

    #[tokio::test]
    async fn test_explicit_selector_forwarded() {
        let provider = fake();
        let handler = SynthesizeHandler::new(provider.clone(), None);

        handler.handle(query(Some("hello"), Some("en-US"))).await.unwrap();
        assert_eq!(provider.last_selector().as_deref(), Some("en-US"));
    }

    #[tokio::test]
    async fn test_success_relays_body_and_format() {
        let handler = SynthesizeHandler::new(fake(), None);

        let response = handler.handle(query(Some("你好"), None)).await.unwrap();
        assert_eq!(response.content_type, "audio/wav");
        assert_eq!(response.cache_max_age, 86400);

        let body = SynthesizedAudio::new(AudioFormat::Wav, response.body)
            .into_bytes()
            .await
            .unwrap();
        assert_eq!(&body[..], b"RIFF-fake");
    }

    #[tokio::test]
    async fn test_cache_max_age_override() {
        let handler = SynthesizeHandler::new(fake(), Some(3600));
        let response = handler.handle(query(Some("hi"), None)).await.unwrap();
        assert_eq!(response.cache_max_age, 3600);
    }

    #[tokio::test]
    async fn test_provider_errors_mapped() {
        let provider = fake();
        provider.fail_with(ProviderError::UpstreamStatus {
            status: 429,
            body: "Too many requests".to_string(),
        });
        let handler = SynthesizeHandler::new(provider.clone(), None);

        let err = handler.handle(query(Some("hi"), None)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::UpstreamSynthesis { status: 429, .. }));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_independent() {
        let provider = fake();
        let handler = SynthesizeHandler::new(provider.clone(), None);

        for _ in 0..2 {
            let response = handler.handle(query(Some("同一句话"), Some("zh-CN"))).await.unwrap();
            let body = SynthesizedAudio::new(AudioFormat::Wav, response.body)
                .into_bytes()
                .await
                .unwrap();
            assert_eq!(&body[..], b"RIFF-fake");
        }
        assert_eq!(provider.call_count(), 2);
    }
}
