//! Synthesize Handler - GET /api/tts

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::SynthesizeQuery;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 查询参数
///
/// 选择器参数名为 `voice`，兼容 `locale` 与 `lang`；同时出现时按此顺序取第一个非空值。
#[derive(Debug, Default, Deserialize)]
pub struct SynthesizeParams {
    pub text: Option<String>,
    pub voice: Option<String>,
    pub locale: Option<String>,
    pub lang: Option<String>,
}

impl SynthesizeParams {
    pub fn selector(self) -> Option<String> {
        [self.voice, self.locale, self.lang]
            .into_iter()
            .flatten()
            .find(|v| !v.trim().is_empty())
    }
}

pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SynthesizeParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(mut params) = params?;
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("synthesize", %request_id, provider = state.provider.name());

    let query = SynthesizeQuery {
        text: params.text.take(),
        selector: params.selector(),
    };

    let result = state
        .synthesize_handler
        .handle(query)
        .instrument(span)
        .await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", result.cache_max_age),
        )
        .body(Body::from_stream(result.body))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
