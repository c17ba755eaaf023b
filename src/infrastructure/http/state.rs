//! Application State

use std::sync::Arc;

use crate::application::{SpeechProviderPort, SynthesizeHandler};

/// 应用状态
///
/// 上游在启动时选定，所有请求只读共享
pub struct AppState {
    pub provider: Arc<dyn SpeechProviderPort>,
    pub synthesize_handler: SynthesizeHandler,
}

impl AppState {
    /// `cache_max_age` 为 None 时使用上游默认缓存时长
    pub fn new(provider: Arc<dyn SpeechProviderPort>, cache_max_age: Option<u64>) -> Self {
        Self {
            provider: provider.clone(),
            synthesize_handler: SynthesizeHandler::new(provider, cache_max_age),
        }
    }
}
