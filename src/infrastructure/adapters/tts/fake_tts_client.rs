//! Fake TTS Client - 用于测试的上游
//!
//! 始终返回固定的音频数据，不发出网络请求；记录调用次数与最近一次的选择器

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    ProviderError, SpeechProviderPort, SynthesisRequest, SynthesizedAudio,
};
use crate::domain::AudioFormat;

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频数据
    pub audio_data: Vec<u8>,
    pub format: AudioFormat,
    pub default_selector: String,
    pub cache_max_age: u64,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            audio_data: b"ID3fake-audio".to_vec(),
            format: AudioFormat::Mpeg,
            default_selector: "zh-CN-XiaoxiaoNeural".to_string(),
            cache_max_age: 86400,
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    calls: AtomicUsize,
    last_selector: Mutex<Option<String>>,
    failure: Mutex<Option<ProviderError>>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        Self {
            config,
            calls: AtomicUsize::new(0),
            last_selector: Mutex::new(None),
            failure: Mutex::new(None),
        }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    /// 之后的每次调用都返回该错误
    pub fn fail_with(&self, error: ProviderError) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(error);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_selector(&self) -> Option<String> {
        self.last_selector.lock().ok().and_then(|s| s.clone())
    }
}

#[async_trait]
impl SpeechProviderPort for FakeTtsClient {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn default_selector(&self) -> &str {
        &self.config.default_selector
    }

    fn audio_format(&self) -> AudioFormat {
        self.config.format
    }

    fn cache_max_age(&self) -> u64 {
        self.config.cache_max_age
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_selector.lock() {
            *last = Some(request.selector.as_str().to_string());
        }

        tracing::debug!(
            text_len = request.text.as_str().len(),
            selector = %request.selector,
            "FakeTtsClient: returning fixed audio"
        );

        if let Some(error) = self.failure.lock().ok().and_then(|f| f.clone()) {
            return Err(error);
        }

        Ok(SynthesizedAudio::from_bytes(
            self.config.format,
            self.config.audio_data.clone(),
        ))
    }
}
