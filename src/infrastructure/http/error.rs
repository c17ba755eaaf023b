//! HTTP Error Handling
//!
//! 所有错误响应均为纯文本，状态码直接反映错误类别

use axum::{
    extract::rejection::QueryRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::Level;

use crate::application::ApplicationError;

const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 调用方输入错误 (400)
    BadRequest(String),
    /// 服务端配置缺失或内部错误 (500)
    Internal(String),
    /// 透传上游状态码
    Upstream { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream { status, .. } => *status,
        }
    }

    /// 4xx（含透传的上游 4xx）记 warn，其余记 error
    pub fn log_level(&self) -> Level {
        if self.status().is_client_error() {
            Level::WARN
        } else {
            Level::ERROR
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
            ApiError::Upstream { message, .. } => message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = match &self {
            ApiError::BadRequest(_) => "Bad request",
            ApiError::Internal(_) => "Internal server error",
            ApiError::Upstream { .. } => "Upstream error relayed",
        };
        if self.log_level() == Level::WARN {
            tracing::warn!(status = status.as_u16(), error = %self.message(), "{}", kind);
        } else {
            tracing::error!(status = status.as_u16(), error = %self.message(), "{}", kind);
        }

        let body = match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
            ApiError::Upstream { message, .. } => message,
        };

        (status, [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], body).into_response()
    }
}

/// 上游状态码不是合法的错误码时退回 502
fn relayable_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::MissingInput(msg) => ApiError::BadRequest(msg),
            ApplicationError::Configuration(msg) => {
                ApiError::Internal(format!("服务端配置错误：{}", msg))
            }
            ApplicationError::UpstreamAuth { status, message } => ApiError::Internal(format!(
                "获取语音服务令牌失败 (HTTP {}): {}",
                status, message
            )),
            ApplicationError::UpstreamSynthesis { status, message } => ApiError::Upstream {
                status: relayable_status(status),
                message: format!("语音合成服务返回错误 (HTTP {}): {}", status, message),
            },
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}
