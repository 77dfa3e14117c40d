//! REST APIハンドラー
//!
//! ヘルスチェック (GET /) と監査プロキシ (POST /audit)

pub mod audit;
pub mod error;
pub mod health;

use crate::{auth, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    // 認証は /audit のみ。ボディを読む前に判定する
    let audit_routes = Router::new()
        .route("/audit", post(audit::audit))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_shared_secret,
        ));

    Router::new()
        .route("/", get(health::liveness))
        .merge(audit_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// 全オリジン許可のCORSレイヤー
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
