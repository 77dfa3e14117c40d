//! 設定管理
//!
//! 環境変数からの読み込みヘルパーと`RelayConfig`構造体。
//! 設定は起動時に一度だけ読み込まれ、以降は読み取り専用で共有される。

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Get an environment variable with fallback to a legacy name
///
/// If the preferred variable name is set, returns its value.
/// If only the legacy variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use luau_audit_relay_common::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("AUDIT_RELAY_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if new_name == old_name {
        return None;
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// 空文字列は未設定として扱う
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// relay設定
#[derive(Clone, Deserialize, PartialEq)]
pub struct RelayConfig {
    /// ホストアドレス (デフォルト: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号 (デフォルト: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// 上流補完APIのAPIキー
    #[serde(default)]
    pub api_key: Option<String>,

    /// `/audit`認証用の共有シークレット
    #[serde(default)]
    pub shared_secret: Option<String>,

    /// 上流補完APIのベースURL (デフォルト: "https://api.openai.com")
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    /// モデル識別子 (デフォルト: "gpt-4o-mini")
    #[serde(default = "default_model")]
    pub model: String,

    /// サンプリング温度 (デフォルト: 0.1)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// リクエストボディ上限（バイト）(デフォルト: 1MB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// 上流呼び出しのタイムアウト（秒）。未設定ならタイムアウトなし
    #[serde(default)]
    pub upstream_timeout_secs: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upstream_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.1
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            shared_secret: None,
            upstream_base_url: default_upstream_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_body_bytes: default_max_body_bytes(),
            upstream_timeout_secs: None,
        }
    }
}

// APIキーと共有シークレットはログに出さない
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("RelayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &redact(&self.api_key))
            .field("shared_secret", &redact(&self.shared_secret))
            .field("upstream_base_url", &self.upstream_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .finish()
    }
}

/// 起動時に報告すべき設定不備
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupWarning {
    /// 上流APIキー未設定（上流呼び出しはすべて失敗する）
    MissingApiKey,
    /// 共有シークレット未設定（`/audit`はすべて401になる）
    MissingSharedSecret,
}

impl fmt::Display for StartupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(
                f,
                "OPENAI_API_KEY is missing; audit requests will fail upstream"
            ),
            Self::MissingSharedSecret => write!(
                f,
                "AUDIT_SHARED_SECRET is missing; every /audit request will be rejected with 401"
            ),
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: get_env_with_fallback_or("AUDIT_RELAY_HOST", "HOST", &defaults.host),
            port: get_env_with_fallback_parse("AUDIT_RELAY_PORT", "PORT", defaults.port),
            api_key: non_empty(get_env_with_fallback(
                "AUDIT_RELAY_OPENAI_API_KEY",
                "OPENAI_API_KEY",
            )),
            shared_secret: non_empty(get_env_with_fallback(
                "AUDIT_RELAY_SHARED_SECRET",
                "AUDIT_SHARED_SECRET",
            )),
            upstream_base_url: get_env_with_fallback_or(
                "AUDIT_RELAY_OPENAI_BASE_URL",
                "OPENAI_BASE_URL",
                &defaults.upstream_base_url,
            ),
            model: get_env_with_fallback_or("AUDIT_RELAY_MODEL", "AUDIT_MODEL", &defaults.model),
            temperature: get_env_with_fallback_parse(
                "AUDIT_RELAY_TEMPERATURE",
                "AUDIT_RELAY_TEMPERATURE",
                defaults.temperature,
            ),
            max_body_bytes: get_env_with_fallback_parse(
                "AUDIT_RELAY_MAX_BODY_BYTES",
                "AUDIT_RELAY_MAX_BODY_BYTES",
                defaults.max_body_bytes,
            ),
            upstream_timeout_secs: get_env_with_fallback(
                "AUDIT_RELAY_UPSTREAM_TIMEOUT_SECS",
                "AUDIT_RELAY_UPSTREAM_TIMEOUT_SECS",
            )
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0),
        }
    }

    /// バインドアドレス ("host:port")
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 上流呼び出しのタイムアウト
    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }

    /// 上流チャット補完エンドポイントのURL
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.upstream_base_url.trim_end_matches('/')
        )
    }

    /// 起動時に報告すべき設定不備の一覧
    pub fn startup_warnings(&self) -> Vec<StartupWarning> {
        let mut warnings = Vec::new();
        if self.api_key.is_none() {
            warnings.push(StartupWarning::MissingApiKey);
        }
        if self.shared_secret.is_none() {
            warnings.push(StartupWarning::MissingSharedSecret);
        }
        warnings
    }
}
