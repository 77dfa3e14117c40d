//! Luau Audit Relay Server
//!
//! Luauスクリプトの監査リクエストを受け取り、上流のLLM補完APIへ中継するサーバー

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// 共有シークレット認証
pub mod auth;

/// CLIインターフェース
pub mod cli;

/// ログ初期化
pub mod logging;

/// axumサーバー起動・シャットダウン
pub mod server;

/// 上流補完APIクライアント
pub mod upstream;

use luau_audit_relay_common::{config::RelayConfig, error::RelayResult};
use std::sync::Arc;
use upstream::{openai::OpenAiClient, CompletionService};

/// アプリケーション状態
///
/// 起動時に一度だけ構築され、以降はすべてのリクエストで読み取り専用で共有される。
#[derive(Clone)]
pub struct AppState {
    /// relay設定
    pub config: Arc<RelayConfig>,
    /// 上流補完サービス
    pub completion: Arc<dyn CompletionService>,
}

impl AppState {
    /// 設定からOpenAI互換クライアントを組み立てて状態を作成
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let client = OpenAiClient::new(&config)?;
        Ok(Self::with_completion(config, Arc::new(client)))
    }

    /// 任意の補完サービスで状態を作成
    pub fn with_completion(config: RelayConfig, completion: Arc<dyn CompletionService>) -> Self {
        Self {
            config: Arc::new(config),
            completion,
        }
    }
}
