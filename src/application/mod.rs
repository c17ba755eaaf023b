//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 上游语音合成服务的端口定义（SpeechProviderPort）
//! - queries: 合成查询及处理器
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod queries;

pub use error::ApplicationError;

pub use ports::{
    AudioStream, ProviderError, SpeechProviderPort, SynthesisRequest, SynthesizedAudio,
};

pub use queries::{handlers::SynthesizeHandler, SynthesizeQuery, SynthesizeResponse};
