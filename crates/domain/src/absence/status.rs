//! 欠席届ステータスと遷移表

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::DomainError;

/// 欠席届ステータス
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AbsenceStatus {
    /// 未処理（初期状態）
    Pending,
    /// 書類待ち
    AwaitingDocs,
    /// 審査中
    UnderReview,
    /// 承認
    Approved,
    /// 却下
    Rejected,
    /// 期限切れ
    Expired,
}

impl AbsenceStatus {
    /// 全ステータス（定義順）
    pub const ALL: [AbsenceStatus; 6] = [
        Self::Pending,
        Self::AwaitingDocs,
        Self::UnderReview,
        Self::Approved,
        Self::Rejected,
        Self::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// このステータスから遷移可能なステータス
    ///
    /// | From | To |
    /// |------|----|
    /// | pending | approved, rejected, under_review, awaiting_docs, expired |
    /// | under_review | approved, rejected, expired |
    /// | awaiting_docs | approved, rejected, expired |
    /// | approved | expired |
    /// | rejected | - |
    /// | expired | - |
    pub fn allowed_targets(&self) -> &'static [AbsenceStatus] {
        match self {
            Self::Pending => &[
                Self::Approved,
                Self::Rejected,
                Self::UnderReview,
                Self::AwaitingDocs,
                Self::Expired,
            ],
            Self::UnderReview | Self::AwaitingDocs => {
                &[Self::Approved, Self::Rejected, Self::Expired]
            }
            Self::Approved => &[Self::Expired],
            Self::Rejected | Self::Expired => &[],
        }
    }

    /// `target` への遷移が遷移表で許可されているか
    pub fn can_transition_to(&self, target: AbsenceStatus) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl std::str::FromStr for AbsenceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "awaiting_docs" => Ok(Self::AwaitingDocs),
            "under_review" => Ok(Self::UnderReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            _ => Err(DomainError::Validation(format!(
                "不正な欠席届ステータス: {}",
                s
            ))),
        }
    }
}
