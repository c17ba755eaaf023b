//! Voxgate - 文本转语音代理
//!
//! 单一接口 GET /api/tts，转发到启动时选定的上游语音服务

use voxgate::config::{load_config, print_config, LogConfig};
use voxgate::infrastructure::adapters::build_provider;
use voxgate::infrastructure::http::{AppState, HttpServer};

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},voxgate={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Voxgate - 文本转语音代理");
    print_config(&config);

    let provider = build_provider(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create speech provider: {}", e))?;

    let state = AppState::new(provider, config.http.cache_max_age_secs);
    let server = HttpServer::new(&config.server, state);

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
