//! # AbsenceRepository
//!
//! 欠席届の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **楽観的ロック**: 遷移の保存は `update_with_version_check` で行い、
//!   読み取り後に別リクエストが更新していれば `InfraError::Conflict` を返す
//! - **採番はストアの責務**: `next_id` がカウンタ・シーケンスから一意な ID を払い出す
//! - **不変条件の検証**: 読み出したレコードは `Absence::from_db` で ADT に変換する

use absenz_domain::{
    absence::{Absence, AbsenceDetails, AbsenceId, AbsenceRecord, AbsenceStatus, EducationType},
    value_objects::Version,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::InfraError;

/// 欠席届リポジトリトレイト
#[async_trait]
pub trait AbsenceRepository: Send + Sync {
    /// 新しい欠席届 ID を払い出す
    ///
    /// 払い出した ID は再利用されない（挿入に失敗しても欠番になる）。
    async fn next_id(&self) -> Result<AbsenceId, InfraError>;

    /// 新規欠席届を保存する
    async fn insert(&self, absence: &Absence) -> Result<(), InfraError>;

    /// 遷移後の欠席届を保存する
    ///
    /// `expected_version` とストア上のバージョンが一致する場合のみ更新する。
    /// 不一致、または対象が存在しない場合は `InfraError::Conflict` を返す。
    async fn update_with_version_check(
        &self,
        absence: &Absence,
        expected_version: Version,
    ) -> Result<(), InfraError>;

    /// ID で欠席届を検索する
    async fn find_by_id(&self, id: &AbsenceId) -> Result<Option<Absence>, InfraError>;

    /// 全件を登録順で取得する
    async fn find_all(&self) -> Result<Vec<Absence>, InfraError>;
}

/// absences テーブルの行
#[derive(sqlx::FromRow)]
struct AbsenceRow {
    id: i64,
    student_id: i64,
    student_name: String,
    student_class: String,
    profession: String,
    phone_private: Option<String>,
    phone_work: Option<String>,
    education_type: Option<String>,
    signature: Option<String>,
    teacher_id: i64,
    teacher_name: String,
    teachers: Vec<String>,
    absence_type: String,
    date_start: String,
    date_end: String,
    reason: String,
    lesson_count: String,
    location: String,
    parent_signature: bool,
    supervisor_signature: bool,
    status: String,
    submission_date: DateTime<Utc>,
    processed_date: Option<DateTime<Utc>>,
    version: i32,
}

impl TryFrom<AbsenceRow> for Absence {
    type Error = InfraError;

    fn try_from(row: AbsenceRow) -> Result<Self, Self::Error> {
        let row_id = row.id;
        let to_unexpected = move |e: absenz_domain::DomainError| {
            InfraError::unexpected(format!("不正な欠席届データ（id: {}）: {}", row_id, e))
        };

        let education_type = row
            .education_type
            .as_deref()
            .map(str::parse::<EducationType>)
            .transpose()
            .map_err(to_unexpected)?;
        let record = AbsenceRecord {
            id: AbsenceId::new(row.id).map_err(to_unexpected)?,
            details: AbsenceDetails {
                student_id: row.student_id,
                student_name: row.student_name,
                student_class: row.student_class,
                profession: row.profession,
                phone_private: row.phone_private,
                phone_work: row.phone_work,
                education_type,
                signature: row.signature,
                teacher_id: row.teacher_id,
                teacher_name: row.teacher_name,
                teachers: row.teachers,
                absence_type: row.absence_type,
                date_start: row.date_start,
                date_end: row.date_end,
                reason: row.reason,
                lesson_count: row.lesson_count,
                location: row.location,
                parent_signature: row.parent_signature,
                supervisor_signature: row.supervisor_signature,
            },
            status: row.status.parse::<AbsenceStatus>().map_err(to_unexpected)?,
            submission_date: row.submission_date,
            processed_date: row.processed_date,
            version: Version::try_from(row.version).map_err(to_unexpected)?,
        };

        Absence::from_db(record).map_err(to_unexpected)
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, student_id, student_name, student_class, profession,
        phone_private, phone_work, education_type, signature,
        teacher_id, teacher_name, teachers, absence_type,
        date_start, date_end, reason, lesson_count, location,
        parent_signature, supervisor_signature,
        status, submission_date, processed_date, version
    FROM absences
"#;

/// PostgreSQL 実装の AbsenceRepository
#[derive(Debug, Clone)]
pub struct PostgresAbsenceRepository {
    pool: PgPool,
}

impl PostgresAbsenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AbsenceRepository for PostgresAbsenceRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn next_id(&self) -> Result<AbsenceId, InfraError> {
        let (id,): (i64,) = sqlx::query_as("SELECT nextval('absence_id_seq')")
            .fetch_one(&self.pool)
            .await?;

        AbsenceId::new(id).map_err(|e| InfraError::unexpected(e.to_string()))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %absence.id()))]
    async fn insert(&self, absence: &Absence) -> Result<(), InfraError> {
        let details = absence.details();
        sqlx::query(
            r#"
            INSERT INTO absences (
                id, student_id, student_name, student_class, profession,
                phone_private, phone_work, education_type, signature,
                teacher_id, teacher_name, teachers, absence_type,
                date_start, date_end, reason, lesson_count, location,
                parent_signature, supervisor_signature,
                status, submission_date, processed_date, version
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
            )
            "#,
        )
        .bind(absence.id().as_i64())
        .bind(details.student_id)
        .bind(&details.student_name)
        .bind(&details.student_class)
        .bind(&details.profession)
        .bind(&details.phone_private)
        .bind(&details.phone_work)
        .bind(details.education_type.map(|t| t.as_str()))
        .bind(&details.signature)
        .bind(details.teacher_id)
        .bind(&details.teacher_name)
        .bind(&details.teachers)
        .bind(&details.absence_type)
        .bind(&details.date_start)
        .bind(&details.date_end)
        .bind(&details.reason)
        .bind(&details.lesson_count)
        .bind(&details.location)
        .bind(details.parent_signature)
        .bind(details.supervisor_signature)
        .bind(absence.status().as_str())
        .bind(absence.submission_date())
        .bind(absence.processed_date())
        .bind(absence.version().as_i32())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %absence.id()))]
    async fn update_with_version_check(
        &self,
        absence: &Absence,
        expected_version: Version,
    ) -> Result<(), InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE absences SET
                status = $1,
                processed_date = $2,
                version = $3
            WHERE id = $4 AND version = $5
            "#,
        )
        .bind(absence.status().as_str())
        .bind(absence.processed_date())
        .bind(absence.version().as_i32())
        .bind(absence.id().as_i64())
        .bind(expected_version.as_i32())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(InfraError::conflict("Absence", absence.id().to_string()));
        }

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &AbsenceId) -> Result<Option<Absence>, InfraError> {
        let row: Option<AbsenceRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Absence::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Absence>, InfraError> {
        let rows: Vec<AbsenceRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Absence::try_from).collect()
    }
}
