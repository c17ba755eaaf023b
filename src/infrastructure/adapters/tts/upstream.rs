//! 上游 HTTP 调用的公共部分

use std::time::Duration;

use futures_util::TryStreamExt;
use reqwest::{Client, IntoUrl, RequestBuilder, Response};

use crate::application::ports::{AudioStream, ProviderError};

/// 上游 HTTP 客户端
///
/// `response_timeout` 只约束连接到收到响应头；音频流开始转发后
/// 不设总时限，只由 `read_timeout` 限制单次读取的停顿。
#[derive(Debug, Clone)]
pub(crate) struct UpstreamClient {
    http: Client,
    response_timeout: Duration,
}

impl UpstreamClient {
    pub(crate) fn new(
        timeout_secs: u64,
        read_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ProviderError> {
        let response_timeout = Duration::from_secs(timeout_secs);
        let http = Client::builder()
            .connect_timeout(response_timeout)
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            http,
            response_timeout,
        })
    }

    pub(crate) fn get(&self, url: impl IntoUrl) -> RequestBuilder {
        self.http.get(url)
    }

    pub(crate) fn post(&self, url: impl IntoUrl) -> RequestBuilder {
        self.http.post(url)
    }

    /// 发送请求，等待响应头不超过 `response_timeout`
    pub(crate) async fn send(
        &self,
        service: &str,
        request: RequestBuilder,
    ) -> Result<Response, ProviderError> {
        match tokio::time::timeout(self.response_timeout, request.send()).await {
            Ok(result) => result.map_err(|e| map_send_error(service, e)),
            Err(_) => Err(ProviderError::Timeout),
        }
    }
}

/// 发送失败映射为 ProviderError
pub(crate) fn map_send_error(service: &str, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_connect() {
        ProviderError::NetworkError(format!("Cannot connect to {}: {}", service, err))
    } else {
        ProviderError::NetworkError(err.to_string())
    }
}

/// 读取错误响应体，读取失败时返回空串
pub(crate) async fn read_error_body(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

/// 非 2xx 响应转为 UpstreamStatus
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = read_error_body(response).await;
    Err(ProviderError::UpstreamStatus {
        status: status.as_u16(),
        body,
    })
}

/// 响应体原样转为音频流
pub(crate) fn relay_body(response: Response) -> AudioStream {
    Box::pin(response.bytes_stream().map_err(std::io::Error::other))
}

/// 判断配置项是否缺失（None 或空串）
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
