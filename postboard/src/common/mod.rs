//! 共通ユーティリティ

/// エラー型定義
pub mod error;

/// IPアドレス正規化
pub mod ip;

/// タイムスタンプの保存形式
pub mod time;
