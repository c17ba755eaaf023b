//! Synthesis Context - 语音合成限界上下文
//!
//! 职责:
//! - 合成文本与音色/语言选择器的校验
//! - 音频格式与 MIME 类型映射
//! - SSML 负载构造（含 XML 转义）

mod errors;
mod ssml;
mod value_objects;

pub use errors::SynthesisError;
pub use ssml::{build_ssml, escape_xml};
pub use value_objects::{AudioFormat, SynthesisText, VoiceSelector};
