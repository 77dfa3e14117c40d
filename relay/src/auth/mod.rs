//! 共有シークレット認証
//!
//! `/audit`は`x-auth-token`ヘッダーが設定済みシークレットと完全一致する場合のみ通す

pub mod middleware;

/// 共有シークレットを運ぶヘッダー名
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// 提示されたトークンが共有シークレットと一致するか
///
/// シークレット未設定の場合、どのトークンも一致しない。
pub fn secret_matches(configured: Option<&str>, presented: Option<&str>) -> bool {
    matches!((configured, presented), (Some(expected), Some(actual)) if expected == actual)
}
