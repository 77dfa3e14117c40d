//! ヘルスチェックAPI

/// 稼働確認メッセージ
pub const LIVENESS_MESSAGE: &str = "AI audit proxy is running";

/// GET / - 稼働確認（認証・上流の状態に依存しない）
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}
