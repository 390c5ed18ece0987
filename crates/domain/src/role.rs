//! # 操作者ロール
//!
//! 欠席届に対する操作は操作者のロールで制御する。
//!
//! | ロール | 許可される操作 |
//! |--------|----------------|
//! | `student` | 欠席届の提出 |
//! | `teacher` | 欠席届の一覧取得・ステータス遷移 |
//!
//! ロールはセッションから取り出し、ワークフローの各操作へ明示的な引数として渡す。
//! ワークフロー自体はセッションや Cookie の仕組みを知らない。

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::DomainError;

/// 操作者ロール
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActorRole {
    /// 生徒（欠席届を提出する）
    Student,
    /// 教員（欠席届を審査する）
    Teacher,
}

impl ActorRole {
    /// 文字列表現を返す
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// 指定ロールであることを要求する
    ///
    /// # Errors
    ///
    /// - `DomainError::Unauthorized`: ロールが一致しない場合
    pub fn require(self, required: ActorRole, action: &str) -> Result<(), DomainError> {
        if self != required {
            return Err(DomainError::Unauthorized(format!(
                "{}は {} のみ実行できます（現在: {}）",
                action, required, self
            )));
        }
        Ok(())
    }
}

impl std::str::FromStr for ActorRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            _ => Err(DomainError::Validation(format!("不正なロール: {}", s))),
        }
    }
}
