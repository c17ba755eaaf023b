//! Synthesize Queries - 语音合成查询

use crate::application::ports::AudioStream;

/// 语音合成查询（原始查询参数，尚未校验）
#[derive(Debug, Clone, Default)]
pub struct SynthesizeQuery {
    pub text: Option<String>,
    pub selector: Option<String>,
}

/// 语音合成响应
pub struct SynthesizeResponse {
    pub body: AudioStream,
    pub content_type: &'static str,
    pub cache_max_age: u64,
}

impl std::fmt::Debug for SynthesizeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesizeResponse")
            .field("content_type", &self.content_type)
            .field("cache_max_age", &self.cache_max_age)
            .finish_non_exhaustive()
    }
}
