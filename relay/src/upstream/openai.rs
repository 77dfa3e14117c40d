//! OpenAI互換チャット補完クライアント

use super::CompletionService;
use async_trait::async_trait;
use luau_audit_relay_common::{
    config::RelayConfig,
    error::{RelayError, RelayResult},
    protocol::{ChatCompletionRequest, ChatCompletionResponse},
};
use serde_json::Value;
use tracing::warn;

/// OpenAI互換の`/v1/chat/completions`クライアント
///
/// `reqwest::Client`は起動時に一度だけ作成し、全リクエストで共有する。
pub struct OpenAiClient {
    http_client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// 設定からクライアントを作成
    pub fn new(config: &RelayConfig) -> RelayResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url: config.chat_completions_url(),
            api_key: config.api_key.clone(),
        })
    }

    /// 送信先URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> RelayResult<ChatCompletionResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RelayError::Internal("OPENAI_API_KEY is not configured".to_string())
        })?;

        let res = self
            .http_client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        if !status.is_success() {
            // エラーボディには choices が無いため、後段で {} に置き換わる
            warn!(
                provider = self.provider_name(),
                status = %status,
                "upstream returned non-success status"
            );
        }

        let bytes = res.bytes().await.map_err(map_reqwest_error)?;
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            RelayError::Internal(format!("Failed to parse upstream response: {}", e))
        })?;

        Ok(ChatCompletionResponse::from_value(body))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RelayError {
    if err.is_timeout() {
        RelayError::Timeout(err.to_string())
    } else {
        RelayError::Http(err.to_string())
    }
}
