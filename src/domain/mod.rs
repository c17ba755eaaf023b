//! Domain Layer - 领域层
//!
//! 只有一个限界上下文:
//! - Synthesis Context: 一次语音合成请求的值对象与 SSML 构造

pub mod synthesis;

pub use synthesis::{
    build_ssml, escape_xml, AudioFormat, SynthesisError, SynthesisText, VoiceSelector,
};
