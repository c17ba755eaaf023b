//! 应用层错误定义
//!
//! 一次合成请求可能的全部失败，均终止本次请求，不重试

use thiserror::Error;

use crate::application::ports::ProviderError;
use crate::domain::SynthesisError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 调用方缺少必填参数
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// 服务端凭据或绑定缺失
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 令牌交换失败
    #[error("Upstream auth error (HTTP {status}): {message}")]
    UpstreamAuth { status: u16, message: String },

    /// 合成请求失败
    #[error("Upstream synthesis error (HTTP {status}): {message}")]
    UpstreamSynthesis { status: u16, message: String },

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建缺少输入错误
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::MissingInput(message.into())
    }

    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<SynthesisError> for ApplicationError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::EmptyText => Self::missing_input("必须提供 \"text\" 查询参数。"),
            SynthesisError::EmptySelector => Self::missing_input(err.to_string()),
        }
    }
}

impl From<ProviderError> for ApplicationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => Self::Configuration(msg),
            ProviderError::TokenRejected { status, body } => Self::UpstreamAuth {
                status,
                message: body,
            },
            ProviderError::UpstreamStatus { status, body } => Self::UpstreamSynthesis {
                status,
                message: body,
            },
            other => Self::InternalError(other.to_string()),
        }
    }
}
