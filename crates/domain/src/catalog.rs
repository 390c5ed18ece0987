//! # 選択肢カタログ
//!
//! 欠席届フォームのプルダウンに表示する固定の選択肢。

use serde::Serialize;

/// クラス
pub const CLASSES: [&str; 6] = ["1A", "1B", "2A", "2B", "3A", "3B"];

/// 職種
pub const PROFESSIONS: [&str; 4] = ["Informatiker", "Kaufmann", "Elektriker", "Mechaniker"];

/// 担当教員
pub const TEACHERS: [&str; 4] = ["Herr Schmidt", "Frau Müller", "Herr Weber", "Frau Fischer"];

/// 欠席種別
pub const ABSENCE_TYPES: [&str; 4] = ["Krankheit", "Arzttermin", "Familiäre Gründe", "Sonstiges"];

/// フォーム用の選択肢一覧
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownOptions {
    pub classes:       Vec<&'static str>,
    pub professions:   Vec<&'static str>,
    pub teachers:      Vec<&'static str>,
    pub absence_types: Vec<&'static str>,
}

impl DropdownOptions {
    /// 標準の選択肢一覧
    pub fn standard() -> Self {
        Self {
            classes:       CLASSES.to_vec(),
            professions:   PROFESSIONS.to_vec(),
            teachers:      TEACHERS.to_vec(),
            absence_types: ABSENCE_TYPES.to_vec(),
        }
    }
}
