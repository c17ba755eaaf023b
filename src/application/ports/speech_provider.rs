//! Speech Provider Port - 上游语音合成服务抽象
//!
//! 每种上游（Workers AI、Google Translate、Azure Speech）是一个策略实现，
//! 进程启动时按配置选定其中一个，运行期间不再切换。

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, Stream, TryStreamExt};
use thiserror::Error;

use crate::domain::{AudioFormat, SynthesisText, VoiceSelector};

/// 上游音频字节流（原样转发，不做转码）
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// 上游调用错误
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// 凭据或绑定缺失，未发出任何网络请求
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// 令牌交换失败
    #[error("Token endpoint returned HTTP {status}: {body}")]
    TokenRejected { status: u16, body: String },

    /// 合成请求返回非 2xx
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 一次合成请求（已校验）
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: SynthesisText,
    pub selector: VoiceSelector,
}

/// 合成结果：声明的音频格式 + 字节流
pub struct SynthesizedAudio {
    pub format: AudioFormat,
    pub body: AudioStream,
}

impl SynthesizedAudio {
    pub fn new(format: AudioFormat, body: AudioStream) -> Self {
        Self { format, body }
    }

    /// 由完整的内存数据构造单块流
    pub fn from_bytes(format: AudioFormat, data: impl Into<Bytes>) -> Self {
        let chunk: Result<Bytes, std::io::Error> = Ok(data.into());
        Self::new(format, Box::pin(stream::once(async move { chunk })))
    }

    /// 读完整个流
    pub async fn into_bytes(self) -> Result<Bytes, std::io::Error> {
        let chunks: Vec<Bytes> = self.body.try_collect().await?;
        Ok(chunks.concat().into())
    }
}

impl std::fmt::Debug for SynthesizedAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesizedAudio")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Speech Provider Port
#[async_trait]
pub trait SpeechProviderPort: Send + Sync {
    /// 上游名称（日志、ping 响应）
    fn name(&self) -> &'static str;

    /// 请求未携带选择器时使用的默认值
    fn default_selector(&self) -> &str;

    /// 上游声明的音频格式
    fn audio_format(&self) -> AudioFormat;

    /// 下游缓存时长（秒）
    fn cache_max_age(&self) -> u64;

    /// 执行一次合成
    ///
    /// 需要令牌的上游在此内部先完成令牌交换；令牌失败时不得发出合成请求。
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesizedAudio, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_bytes_roundtrip() {
        let audio = SynthesizedAudio::from_bytes(AudioFormat::Wav, vec![1u8, 2, 3]);
        assert_eq!(audio.format, AudioFormat::Wav);
        assert_eq!(audio.into_bytes().await.unwrap(), Bytes::from_static(&[1, 2, 3]));
    }

    #[tokio::test]
    async fn test_into_bytes_joins_chunks() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"ID3")),
            Ok(Bytes::from_static(b"frame")),
        ];
        let audio = SynthesizedAudio::new(AudioFormat::Mpeg, Box::pin(stream::iter(chunks)));
        assert_eq!(audio.into_bytes().await.unwrap(), Bytes::from_static(b"ID3frame"));
    }

    #[tokio::test]
    async fn test_into_bytes_propagates_stream_error() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("connection reset")),
        ];
        let audio = SynthesizedAudio::new(AudioFormat::Ogg, Box::pin(stream::iter(chunks)));
        assert!(audio.into_bytes().await.is_err());
    }
}
