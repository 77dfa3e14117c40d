//! 認証ミドルウェア

use crate::api::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use luau_audit_relay_common::error::RelayError;

use super::{secret_matches, AUTH_TOKEN_HEADER};

/// `x-auth-token`を検証するミドルウェア
///
/// 不一致ならボディを読まずに401を返す。非UTF-8のヘッダー値は欠落と同じ扱い。
pub async fn require_shared_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok());

    if !secret_matches(state.config.shared_secret.as_deref(), presented) {
        return Err(RelayError::Unauthorized.into());
    }

    Ok(next.run(request).await)
}
