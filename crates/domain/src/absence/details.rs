//! 欠席届の記載内容
//!
//! ワークフローはこれらの項目を解釈せず、提出時の値をそのまま保持する。
//! 提出時に行うのは必須項目の存在チェックのみ。

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// 教育課程区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationType {
    /// 職業学校（Berufsschule）
    #[serde(rename = "BS")]
    Bs,
    /// 職業上級学校（Berufsmaturität）
    #[serde(rename = "BM")]
    Bm,
}

impl EducationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bs => "BS",
            Self::Bm => "BM",
        }
    }
}

impl std::str::FromStr for EducationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BS" => Ok(Self::Bs),
            "BM" => Ok(Self::Bm),
            _ => Err(DomainError::Validation(format!("不正な教育課程区分: {}", s))),
        }
    }
}

fn default_absence_type() -> String {
    "Krankheit".to_string()
}

/// 欠席届の記載内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceDetails {
    pub student_id:           i64,
    pub student_name:         String,
    pub student_class:        String,
    pub profession:           String,
    #[serde(default)]
    pub phone_private:        Option<String>,
    #[serde(default)]
    pub phone_work:           Option<String>,
    #[serde(default)]
    pub education_type:       Option<EducationType>,
    #[serde(default)]
    pub signature:            Option<String>,
    pub teacher_id:           i64,
    pub teacher_name:         String,
    pub teachers:             Vec<String>,
    #[serde(default = "default_absence_type")]
    pub absence_type:         String,
    pub date_start:           String,
    pub date_end:             String,
    pub reason:               String,
    pub lesson_count:         String,
    pub location:             String,
    #[serde(default)]
    pub parent_signature:     bool,
    #[serde(default)]
    pub supervisor_signature: bool,
}

impl AbsenceDetails {
    /// 必須項目の存在チェック
    ///
    /// 値の意味（日付の前後関係、時限数の妥当性など）は検証しない。
    ///
    /// # Errors
    ///
    /// 最初に見つかった欠落項目を `DomainError::Validation` で返す。
    pub fn validate_presence(&self) -> Result<(), DomainError> {
        let required = [
            (&self.student_name, "氏名"),
            (&self.student_class, "クラス"),
            (&self.profession, "職種"),
            (&self.teacher_name, "担当教員"),
            (&self.reason, "理由"),
            (&self.lesson_count, "時限数"),
            (&self.location, "場所"),
        ];

        if let Some((_, label)) = required.iter().find(|(value, _)| value.trim().is_empty()) {
            return Err(DomainError::Validation(format!("{}は必須です", label)));
        }

        if self.teachers.iter().all(|t| t.trim().is_empty()) {
            return Err(DomainError::Validation(
                "教員を 1 名以上選択する必要があります".to_string(),
            ));
        }

        Ok(())
    }
}
