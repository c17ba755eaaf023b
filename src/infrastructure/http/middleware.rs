//! 请求日志中间件

use std::time::Instant;

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

/// 按状态码分级记录每个请求
///
/// 4xx 记 warn，5xx 记 error，其余只在 debug 级别出现。
/// 错误正文由 ApiError 记录，这里只关心状态与耗时。
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match classify(status) {
        Outcome::ServerError => {
            tracing::error!(%method, %path, status = status.as_u16(), elapsed_ms, "Request failed");
        }
        Outcome::ClientError => {
            tracing::warn!(%method, %path, status = status.as_u16(), elapsed_ms, "Request rejected");
        }
        Outcome::Ok => {
            tracing::debug!(%method, %path, status = status.as_u16(), elapsed_ms, "Request served");
        }
    }

    response
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Ok,
    ClientError,
    ServerError,
}

fn classify(status: StatusCode) -> Outcome {
    if status.is_server_error() {
        Outcome::ServerError
    } else if status.is_client_error() {
        Outcome::ClientError
    } else {
        Outcome::Ok
    }
}
