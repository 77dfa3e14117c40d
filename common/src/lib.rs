//! Luau Audit Relay 共通ライブラリ
//!
//! 設定、エラー型、上流API通信プロトコルの定義

#![warn(missing_docs)]

/// 設定管理
pub mod config;

/// エラー型定義
pub mod error;

/// 通信プロトコル定義
pub mod protocol;
