//! 監査プロキシ APIハンドラー

use crate::{api::error::AppError, AppState};
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use luau_audit_relay_common::protocol::{AuditOutcome, AuditRequest, ChatCompletionRequest};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// POST /audit - スクリプト群を上流LLMで監査する
///
/// 認証はミドルウェアで済んでいる前提。ボディは生バイトで受け取り、
/// Content-Typeに関係なく`{ "scripts": [...] }`として検証する。
pub async fn audit(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let request = AuditRequest::from_body(&body)?;

    let req_id = Uuid::new_v4();
    let started = Instant::now();

    let payload = ChatCompletionRequest::for_audit(
        &request,
        &state.config.model,
        state.config.temperature,
    )?;
    let completion = state.completion.complete(&payload).await?;

    if completion.first_content().is_none() {
        debug!(
            request_id = %req_id,
            "upstream response has no choices[0].message.content, substituting {{}}"
        );
    }
    let outcome = AuditOutcome::from_completion(completion.content_or_empty_object());

    info!(
        provider = state.completion.provider_name(),
        model = %state.config.model,
        request_id = %req_id,
        scripts = request.len(),
        parsed = matches!(outcome, AuditOutcome::Parsed(_)),
        latency_ms = started.elapsed().as_millis(),
        "audit complete"
    );

    Ok(outcome_response(outcome))
}

/// 監査結果をHTTPレスポンスに変換
///
/// JSONとして解釈できた出力はJSONで、できなかった出力は生テキストのまま返す。
fn outcome_response(outcome: AuditOutcome) -> Response {
    match outcome {
        AuditOutcome::Parsed(value) => Json(value).into_response(),
        AuditOutcome::Raw(text) => text.into_response(),
    }
}
