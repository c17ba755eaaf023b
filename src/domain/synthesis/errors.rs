//! Synthesis Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("合成文本不能为空")]
    EmptyText,

    #[error("音色/语言选择器不能为空")]
    EmptySelector,
}
