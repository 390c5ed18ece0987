//! テスト共通フィクスチャ

#![allow(dead_code)]

use absenz_domain::absence::{Absence, AbsenceDetails, AbsenceId, EducationType, NewAbsence};
use chrono::{DateTime, Utc};

/// テスト用の固定時刻
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// テスト用の未処理欠席届を作成する
pub fn create_test_absence(id: AbsenceId) -> Absence {
    Absence::new(NewAbsence {
        id,
        details: AbsenceDetails {
            student_id:           1,
            student_name:         "Max Mustermann".to_string(),
            student_class:        "2A".to_string(),
            profession:           "Informatiker".to_string(),
            phone_private:        Some("079 123 45 67".to_string()),
            phone_work:           None,
            education_type:       Some(EducationType::Bm),
            signature:            None,
            teacher_id:           2,
            teacher_name:         "Frau Müller".to_string(),
            teachers:             vec!["Frau Müller".to_string(), "Herr Weber".to_string()],
            absence_type:         "Arzttermin".to_string(),
            date_start:           "2024-03-04".to_string(),
            date_end:             "2024-03-04".to_string(),
            reason:               "Zahnarzt".to_string(),
            lesson_count:         "2".to_string(),
            location:             "Bern".to_string(),
            parent_signature:     true,
            supervisor_signature: true,
        },
        now: test_now(),
    })
}
