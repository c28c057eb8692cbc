//! 入力値の構造検証
//!
//! 必須・最大長のみを扱う。違反は全件を集約して1つの`BoardError::Validation`で返す。

use crate::common::error::{BoardError, BoardResult};

/// 投稿名の最大文字数
pub const MAX_NAME_LEN: usize = 100;
/// 投稿説明の最大文字数
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// フィルタ語の最大文字数
pub const MAX_FILTER_TERM_LEN: usize = 50;

/// 検証結果（違反ルールの一覧）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Validation {
    errors: Vec<String>,
}

impl Validation {
    /// 違反がなければtrue
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// 違反ルール一覧
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// 必須チェック。空白のみも未入力として扱う
    fn required(&mut self, value: &str, rule: &str) -> bool {
        if value.trim().is_empty() {
            self.errors.push(rule.to_string());
            return false;
        }
        true
    }

    fn max_len(&mut self, value: &str, max: usize, rule: &str) {
        if value.chars().count() > max {
            self.errors.push(rule.to_string());
        }
    }

    /// 違反があれば`BoardError::Validation`に変換
    pub fn into_result(self) -> BoardResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(BoardError::Validation(self.errors))
        }
    }
}

/// 投稿の名前・説明を検証する
///
/// フィールドごとに報告するのは1ルールまで（未入力が長さ超過より優先）。
pub fn validate_post(name: &str, description: &str) -> Validation {
    let mut v = Validation::default();

    if v.required(name, "Name is required and cannot be empty") {
        v.max_len(
            name,
            MAX_NAME_LEN,
            &format!("Name cannot exceed {} characters", MAX_NAME_LEN),
        );
    }

    if v.required(description, "Description is required and cannot be empty") {
        v.max_len(
            description,
            MAX_DESCRIPTION_LEN,
            &format!("Description cannot exceed {} characters", MAX_DESCRIPTION_LEN),
        );
    }

    v
}

/// IDの必須チェック
pub fn validate_id(id: &str) -> Validation {
    let mut v = Validation::default();
    v.required(id, "ID is required");
    v
}

/// フィルタ語（投稿名フィルタ・監査ログ検索語）を検証する
pub fn validate_filter_term(term: &str) -> Validation {
    let mut v = Validation::default();
    v.max_len(
        term,
        MAX_FILTER_TERM_LEN,
        &format!("Filter cannot exceed {} characters", MAX_FILTER_TERM_LEN),
    );
    v
}
