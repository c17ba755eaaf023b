//! Azure Speech 令牌交换
//!
//! 两种来源：
//! - 订阅密钥：`POST https://{region}.api.cognitive.microsoft.com/sts/v1.0/issueToken`，
//!   请求头 `Ocp-Apim-Subscription-Key`，响应体即令牌文本
//! - 公开端点：`GET <url>`，响应 JSON `{"token": "...", "region": "..."}`
//!
//! 令牌每次请求重新获取，不做缓存。

use serde::Deserialize;

use super::upstream::{non_empty, read_error_body, UpstreamClient};
use crate::application::ports::ProviderError;

/// 换到的短期令牌
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub value: String,
    pub region: Option<String>,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("value", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct PublicTokenResponse {
    token: String,
    #[serde(default)]
    region: Option<String>,
}

/// 令牌来源
#[derive(Clone)]
pub enum TokenSource {
    SubscriptionKey {
        key: Option<String>,
        region: Option<String>,
        /// 覆盖 issueToken 地址
        endpoint: Option<String>,
    },
    Public {
        url: Option<String>,
    },
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubscriptionKey {
                key,
                region,
                endpoint,
            } => f
                .debug_struct("SubscriptionKey")
                .field("key", &key.as_ref().map(|_| "<redacted>"))
                .field("region", region)
                .field("endpoint", endpoint)
                .finish(),
            Self::Public { url } => f.debug_struct("Public").field("url", url).finish(),
        }
    }
}

impl TokenSource {
    /// 订阅密钥流程下配置的区域
    pub fn configured_region(&self) -> Option<&str> {
        match self {
            Self::SubscriptionKey { region, .. } => non_empty(region),
            Self::Public { .. } => None,
        }
    }

    /// 检查配置完整性，不发出网络请求
    pub fn ensure_configured(&self) -> Result<(), ProviderError> {
        self.token_endpoint().map(|_| ())
    }

    fn token_endpoint(&self) -> Result<String, ProviderError> {
        match self {
            Self::SubscriptionKey {
                key,
                region,
                endpoint,
            } => {
                if non_empty(key).is_none() {
                    return Err(ProviderError::NotConfigured(
                        "Azure subscription key is not set (AZURE_SPEECH_KEY)".to_string(),
                    ));
                }
                if let Some(endpoint) = non_empty(endpoint) {
                    return Ok(endpoint.to_string());
                }
                let region = non_empty(region).ok_or_else(|| {
                    ProviderError::NotConfigured(
                        "Azure region is not set (AZURE_SPEECH_REGION)".to_string(),
                    )
                })?;
                Ok(format!(
                    "https://{}.api.cognitive.microsoft.com/sts/v1.0/issueToken",
                    region
                ))
            }
            Self::Public { url } => non_empty(url).map(str::to_string).ok_or_else(|| {
                ProviderError::NotConfigured("Azure public token URL is not set".to_string())
            }),
        }
    }

    /// 获取令牌
    ///
    /// 非 2xx 返回 `TokenRejected`，调用方据此放弃后续合成请求。
    pub(crate) async fn issue(&self, client: &UpstreamClient) -> Result<IssuedToken, ProviderError> {
        let endpoint = self.token_endpoint()?;

        tracing::debug!(url = %endpoint, "Requesting Azure speech token");

        let request = match self {
            Self::SubscriptionKey { key, .. } => client
                .post(&endpoint)
                .header("Ocp-Apim-Subscription-Key", non_empty(key).unwrap_or_default())
                .body(""),
            Self::Public { .. } => client.get(&endpoint),
        };

        let response = client.send("Azure token endpoint", request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            tracing::warn!(status = status.as_u16(), "Azure token request rejected");
            return Err(ProviderError::TokenRejected {
                status: status.as_u16(),
                body,
            });
        }

        let token = match self {
            Self::SubscriptionKey { .. } => {
                let value = response
                    .text()
                    .await
                    .map_err(|e| ProviderError::InvalidResponse(format!("Failed to read token: {}", e)))?;
                IssuedToken {
                    value: value.trim().to_string(),
                    region: self.configured_region().map(str::to_string),
                }
            }
            Self::Public { .. } => {
                let parsed: PublicTokenResponse = response.json().await.map_err(|e| {
                    ProviderError::InvalidResponse(format!("Malformed token response: {}", e))
                })?;
                IssuedToken {
                    value: parsed.token.trim().to_string(),
                    region: parsed.region.filter(|r| !r.trim().is_empty()),
                }
            }
        };

        if token.value.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "Token endpoint returned an empty token".to_string(),
            ));
        }

        Ok(token)
    }
}
