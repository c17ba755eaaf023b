//! HTTP Server
//!
//! 组装路由与中间件，监听端口直到收到关闭信号

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use http::{header::CONTENT_TYPE, Method};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::middleware::request_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::ServerConfig;

/// 构建带中间件的 Router
///
/// 音频由浏览器 `<audio>` 直接引用，CORS 只开放只读方法。
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .expose_headers(Any)
        .max_age(Duration::from_secs(3600));

    create_routes()
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// HTTP 服务器
pub struct HttpServer {
    addr: String,
    router: Router,
}

impl HttpServer {
    pub fn new(server: &ServerConfig, state: AppState) -> Self {
        Self {
            addr: server.addr(),
            router: build_router(Arc::new(state)),
        }
    }

    /// 运行到 `shutdown` 完成，已接受的请求处理完再退出
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.addr).await?;
        tracing::info!(addr = %self.addr, "Listening for synthesis requests");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
