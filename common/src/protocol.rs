//! 通信プロトコル定義
//!
//! 呼び出し元からの監査リクエストと、上流チャット補完APIとの間で
//! やり取りするメッセージ

use crate::error::CommonError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 監査用システムプロンプト
pub const AUDIT_SYSTEM_PROMPT: &str =
    "You are a senior Roblox Luau code auditor. Return only JSON with issues and suggested fixes.";

/// `scripts`が欠落・配列以外の場合のエラーメッセージ
pub const MISSING_SCRIPTS_MESSAGE: &str = "Missing scripts array";

/// 抽出できなかった場合に代わりに使う補完テキスト
pub const EMPTY_COMPLETION: &str = "{}";

/// 監査リクエスト (POST /audit)
///
/// 各要素は不透明なテキストとしてそのまま上流に転送される。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuditRequest {
    /// 監査対象のスクリプト
    pub scripts: Vec<Value>,
}

impl AuditRequest {
    /// 生のリクエストボディから監査リクエストを取り出す
    ///
    /// 空ボディ、不正なJSON、オブジェクト以外、`scripts`欠落、配列以外は
    /// すべて同じ検証エラーになる。
    pub fn from_body(body: &[u8]) -> Result<Self, CommonError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| CommonError::Validation(MISSING_SCRIPTS_MESSAGE.to_string()))?;
        match value.get("scripts") {
            Some(Value::Array(scripts)) => Ok(Self {
                scripts: scripts.clone(),
            }),
            _ => Err(CommonError::Validation(MISSING_SCRIPTS_MESSAGE.to_string())),
        }
    }

    /// スクリプト数
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// スクリプトが空かどうか
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// 上流へ送るユーザーメッセージ本文（`{ "scripts": [...] }`の整形JSON）
    pub fn to_prompt(&self) -> Result<String, CommonError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// チャットメッセージ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// ロール ("system", "user", "assistant")
    pub role: String,
    /// メッセージ内容
    pub content: String,
}

impl ChatMessage {
    /// systemロールのメッセージ
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// userロールのメッセージ
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// レスポンス形式指定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseFormat {
    /// 形式 ("json_object")
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    /// JSONオブジェクト形式
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// 上流チャット補完リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// モデル名
    pub model: String,
    /// サンプリング温度
    pub temperature: f64,
    /// メッセージ配列
    pub messages: Vec<ChatMessage>,
    /// レスポンス形式
    pub response_format: ResponseFormat,
}

impl ChatCompletionRequest {
    /// 監査リクエストから上流ペイロードを組み立てる
    ///
    /// system指示と整形済み`{ scripts }`の2メッセージ構成。
    pub fn for_audit(
        request: &AuditRequest,
        model: &str,
        temperature: f64,
    ) -> Result<Self, CommonError> {
        Ok(Self {
            model: model.to_string(),
            temperature,
            messages: vec![
                ChatMessage::system(AUDIT_SYSTEM_PROMPT),
                ChatMessage::user(request.to_prompt()?),
            ],
            response_format: ResponseFormat::json_object(),
        })
    }
}

/// 上流チャット補完レスポンス
///
/// どの階層のフィールドも欠落しうるため、すべて`Option`で受ける。
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// 補完候補
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

/// 補完候補
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Choice {
    /// アシスタントメッセージ
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// 補完候補のメッセージ
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// テキスト内容
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// 上流レスポンスボディ（任意のJSON値）から読み取る
    ///
    /// 想定外の形（`choices`が配列でない等）は「欠落」とみなす。
    pub fn from_value(value: Value) -> Self {
        let choices = value
            .get("choices")
            .and_then(Value::as_array)
            .map(|choices| {
                choices
                    .iter()
                    .map(|choice| Choice {
                        message: choice.get("message").map(|message| ChoiceMessage {
                            content: message
                                .get("content")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                        }),
                    })
                    .collect()
            });
        Self { choices }
    }

    /// `choices[0].message.content`
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .as_ref()?
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
    }

    /// 補完テキスト。取り出せない、または空なら`"{}"`
    pub fn content_or_empty_object(&self) -> &str {
        match self.first_content() {
            Some(content) if !content.is_empty() => content,
            _ => EMPTY_COMPLETION,
        }
    }
}

/// 監査結果
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    /// JSONとして解釈できたモデル出力
    Parsed(Value),
    /// JSONとして解釈できなかったモデル出力（そのまま返す）
    Raw(String),
}

impl AuditOutcome {
    /// モデル出力テキストを結果に変換する
    pub fn from_completion(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::Parsed(value),
            Err(_) => Self::Raw(text.to_string()),
        }
    }
}
