//! 按配置选定唯一的上游实现

use std::sync::Arc;

use super::azure_speech_client::{AzureSpeechClient, AzureSpeechClientConfig};
use super::azure_token::TokenSource;
use super::google_translate_client::{GoogleTranslateClient, GoogleTranslateClientConfig};
use super::workers_ai_client::{WorkersAiClient, WorkersAiClientConfig};
use crate::application::ports::{ProviderError, SpeechProviderPort};
use crate::config::{AppConfig, AzureTokenSource, ProviderKind};

/// 构建当前部署使用的上游
///
/// 凭据缺失不会失败，只在启动时告警；请求时由上游返回配置错误。
pub fn build_provider(config: &AppConfig) -> Result<Arc<dyn SpeechProviderPort>, ProviderError> {
    let timeout_secs = config.provider.timeout_secs;
    let read_timeout_secs = config.provider.read_timeout_secs;
    let user_agent = config.provider.user_agent.clone();

    let provider: Arc<dyn SpeechProviderPort> = match config.provider.kind {
        ProviderKind::Azure => {
            let azure = &config.azure;
            let token_source = match azure.token_source {
                AzureTokenSource::SubscriptionKey => TokenSource::SubscriptionKey {
                    key: azure.subscription_key.clone(),
                    region: azure.region.clone(),
                    endpoint: azure.token_endpoint.clone(),
                },
                AzureTokenSource::Public => TokenSource::Public {
                    url: azure.token_url.clone(),
                },
            };
            if let Err(e) = token_source.ensure_configured() {
                tracing::warn!(error = %e, "Azure provider is missing configuration");
            }

            let mut client_config = AzureSpeechClientConfig::new(token_source)
                .with_output_format(azure.output_format.clone());
            client_config.tts_endpoint = azure.tts_endpoint.clone();
            client_config.default_voice = azure.default_voice.clone();
            client_config.user_agent = user_agent;
            client_config.timeout_secs = timeout_secs;
            client_config.read_timeout_secs = read_timeout_secs;

            Arc::new(AzureSpeechClient::new(client_config)?)
        }
        ProviderKind::WorkersAi => {
            let workers = &config.workers_ai;
            if workers.account_id.is_none() || workers.api_token.is_none() {
                tracing::warn!("Workers AI provider is missing account id or API token");
            }

            Arc::new(WorkersAiClient::new(WorkersAiClientConfig {
                account_id: workers.account_id.clone(),
                api_token: workers.api_token.clone(),
                base_url: workers.base_url.clone(),
                model: workers.model.clone(),
                default_lang: workers.default_lang.clone(),
                user_agent,
                timeout_secs,
                read_timeout_secs,
                ..Default::default()
            })?)
        }
        ProviderKind::GoogleTranslate => Arc::new(GoogleTranslateClient::new(
            GoogleTranslateClientConfig {
                base_url: config.google.base_url.clone(),
                default_lang: config.google.default_lang.clone(),
                user_agent,
                timeout_secs,
                read_timeout_secs,
                ..Default::default()
            },
        )?),
    };

    tracing::info!(
        provider = provider.name(),
        default_selector = provider.default_selector(),
        format = provider.audio_format().mime_type(),
        "Speech provider selected"
    );

    Ok(provider)
}
