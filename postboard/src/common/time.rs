//! タイムスタンプの保存形式
//!
//! DBにはマイクロ秒固定幅のRFC 3339 (UTC, `Z`終端) で保存する。
//! 固定幅なので文字列比較がそのまま時刻比較になる。

use crate::common::error::{BoardError, BoardResult};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// 保存精度（マイクロ秒）に丸めた現在時刻
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// 保存精度に丸める
pub fn truncate(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(6)
}

/// DB保存用の文字列に変換
pub fn to_db_string(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// DBの文字列をパース
pub fn parse_db_string(value: &str, column: &str) -> BoardResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BoardError::Database(format!("Failed to parse {}: {}", column, e)))
}
