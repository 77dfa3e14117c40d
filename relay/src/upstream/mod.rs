//! 上流補完APIの抽象化
//!
//! ハンドラーは`CompletionService` traitだけに依存し、
//! 本番ではOpenAI互換クライアント、テストでは記録用のダブルを差し込む。

pub mod openai;

use async_trait::async_trait;
use luau_audit_relay_common::{
    error::RelayResult,
    protocol::{ChatCompletionRequest, ChatCompletionResponse},
};

/// チャット補完サービス
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// プロバイダ名（ログ用）
    fn provider_name(&self) -> &str;

    /// 補完リクエストを1回送信し、レスポンスを返す（リトライなし）
    async fn complete(&self, request: &ChatCompletionRequest)
        -> RelayResult<ChatCompletionResponse>;
}
