//! ログ初期化
//!
//! `AUDIT_RELAY_LOG_LEVEL`（未設定なら`RUST_LOG`）のフィルタで
//! tracing-subscriberのfmtレイヤーを登録する。

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

const DEFAULT_LOG_LEVEL: &str = "info";

/// フィルタ文字列を決める
fn filter_directive(relay_level: Option<String>, rust_log: Option<String>) -> String {
    relay_level
        .or(rust_log)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// グローバルsubscriberを登録する（プロセスで1回だけ）
pub fn init() -> Result<(), TryInitError> {
    let directive = filter_directive(
        std::env::var("AUDIT_RELAY_LOG_LEVEL").ok(),
        std::env::var("RUST_LOG").ok(),
    );

    tracing_subscriber::registry()
        .with(build_filter(&directive))
        .with(fmt::layer().with_target(true))
        .try_init()
}
