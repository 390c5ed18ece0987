//! 欠席届エンティティ
//!
//! 状態は ADT で表現し、「未処理以外なら処理日時を持つ」という不変条件を型で強制する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AbsenceDetails, AbsenceStatus};
use crate::{DomainError, role::ActorRole, value_objects::Version};

define_serial_id! {
    /// 欠席届 ID
    pub struct AbsenceId {
        label: "欠席届 ID",
    }
}

/// 処理済み状態の固有フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessedState {
    /// 直近の遷移日時
    pub processed_at: DateTime<Utc>,
}

/// 欠席届の状態（ADT ベースステートマシン）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceState {
    /// 未処理
    Pending,
    /// 書類待ち
    AwaitingDocs(ProcessedState),
    /// 審査中
    UnderReview(ProcessedState),
    /// 承認
    Approved(ProcessedState),
    /// 却下
    Rejected(ProcessedState),
    /// 期限切れ
    Expired(ProcessedState),
}

impl AbsenceState {
    fn processed(status: AbsenceStatus, processed_at: DateTime<Utc>) -> Self {
        let state = ProcessedState { processed_at };
        match status {
            AbsenceStatus::Pending => Self::Pending,
            AbsenceStatus::AwaitingDocs => Self::AwaitingDocs(state),
            AbsenceStatus::UnderReview => Self::UnderReview(state),
            AbsenceStatus::Approved => Self::Approved(state),
            AbsenceStatus::Rejected => Self::Rejected(state),
            AbsenceStatus::Expired => Self::Expired(state),
        }
    }
}

/// 欠席届エンティティ
///
/// 生徒が提出した 1 件の欠席届。記載内容は不変で、
/// 変更されるのはステータスと処理日時（とバージョン）のみ。
///
/// ## 楽観的ロック
///
/// `version` は遷移のたびにインクリメントされる。
/// ストアは更新時に読み取り時点の version と比較し、不一致なら競合とする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Absence {
    id:              AbsenceId,
    details:         AbsenceDetails,
    submission_date: DateTime<Utc>,
    version:         Version,
    state:           AbsenceState,
}

/// 欠席届の新規作成パラメータ
pub struct NewAbsence {
    pub id:      AbsenceId,
    pub details: AbsenceDetails,
    pub now:     DateTime<Utc>,
}

/// 欠席届の永続化表現
///
/// ストアのフラット構造を表現する。`Absence::from_db()` で不変条件を検証して ADT に変換する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceRecord {
    pub id:              AbsenceId,
    #[serde(flatten)]
    pub details:         AbsenceDetails,
    pub status:          AbsenceStatus,
    pub submission_date: DateTime<Utc>,
    pub processed_date:  Option<DateTime<Utc>>,
    #[serde(default)]
    pub version:         Version,
}

impl Absence {
    /// 提出された欠席届を作成する（未処理・処理日時なし）
    pub fn new(params: NewAbsence) -> Self {
        Self {
            id:              params.id,
            details:         params.details,
            submission_date: params.now,
            version:         Version::initial(),
            state:           AbsenceState::Pending,
        }
    }

    /// 永続化表現から復元する
    ///
    /// # Errors
    ///
    /// - `DomainError::Validation`: 未処理なのに処理日時がある、または処理済みなのに処理日時がない
    pub fn from_db(record: AbsenceRecord) -> Result<Self, DomainError> {
        let state = match (record.status, record.processed_date) {
            (AbsenceStatus::Pending, None) => AbsenceState::Pending,
            (AbsenceStatus::Pending, Some(_)) => {
                return Err(DomainError::Validation(format!(
                    "未処理の欠席届に処理日時は設定できません（id: {}）",
                    record.id
                )));
            }
            (status, Some(processed_at)) => AbsenceState::processed(status, processed_at),
            (status, None) => {
                return Err(DomainError::Validation(format!(
                    "{} の欠席届には処理日時が必要です（id: {}）",
                    status, record.id
                )));
            }
        };

        Ok(Self {
            id: record.id,
            details: record.details,
            submission_date: record.submission_date,
            version: record.version,
            state,
        })
    }

    /// 永続化表現に変換する
    pub fn to_record(&self) -> AbsenceRecord {
        AbsenceRecord {
            id:              self.id,
            details:         self.details.clone(),
            status:          self.status(),
            submission_date: self.submission_date,
            processed_date:  self.processed_date(),
            version:         self.version,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> AbsenceId {
        self.id
    }

    pub fn details(&self) -> &AbsenceDetails {
        &self.details
    }

    pub fn submission_date(&self) -> DateTime<Utc> {
        self.submission_date
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn state(&self) -> &AbsenceState {
        &self.state
    }

    pub fn status(&self) -> AbsenceStatus {
        match self.state {
            AbsenceState::Pending => AbsenceStatus::Pending,
            AbsenceState::AwaitingDocs(_) => AbsenceStatus::AwaitingDocs,
            AbsenceState::UnderReview(_) => AbsenceStatus::UnderReview,
            AbsenceState::Approved(_) => AbsenceStatus::Approved,
            AbsenceState::Rejected(_) => AbsenceStatus::Rejected,
            AbsenceState::Expired(_) => AbsenceStatus::Expired,
        }
    }

    pub fn processed_date(&self) -> Option<DateTime<Utc>> {
        match self.state {
            AbsenceState::Pending => None,
            AbsenceState::AwaitingDocs(s)
            | AbsenceState::UnderReview(s)
            | AbsenceState::Approved(s)
            | AbsenceState::Rejected(s)
            | AbsenceState::Expired(s) => Some(s.processed_at),
        }
    }

    // ビジネスロジックメソッド

    /// ステータスを遷移させた新しい欠席届を返す
    ///
    /// 成功時はステータスを `target` に、処理日時を `now` に置き換え、version を進める。
    /// 失敗時は `self` を消費するが、呼び出し元はストア上の元データを保持しているため
    /// 部分的な更新は発生しない。
    ///
    /// # Errors
    ///
    /// - `DomainError::Unauthorized`: 操作者が教員でない場合
    /// - `DomainError::InvalidTransition`: 遷移表にない遷移の場合
    pub fn transitioned(
        self,
        target: AbsenceStatus,
        actor: ActorRole,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        actor.require(ActorRole::Teacher, "欠席届のステータス変更")?;

        let current = self.status();
        if !current.can_transition_to(target) {
            return Err(DomainError::InvalidTransition {
                from: current,
                to:   target,
            });
        }

        Ok(Self {
            state: AbsenceState::processed(target, now),
            version: self.version.next(),
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::absence::details::test_support::sample_details;

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[fixture]
    fn later() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_086_400, 0).unwrap()
    }

    #[fixture]
    fn pending(now: DateTime<Utc>) -> Absence {
        Absence::new(NewAbsence {
            id: AbsenceId::new(1).unwrap(),
            details: sample_details(),
            now,
        })
    }

    /// 指定ステータスの欠席届を復元する
    fn absence_in(status: AbsenceStatus, now: DateTime<Utc>) -> Absence {
        let processed_date = (status != AbsenceStatus::Pending).then_some(now);
        Absence::from_db(AbsenceRecord {
            id: AbsenceId::new(1).unwrap(),
            details: sample_details(),
            status,
            submission_date: now,
            processed_date,
            version: Version::initial(),
        })
        .unwrap()
    }

    #[rstest]
    fn test_新規作成の初期状態(pending: Absence, now: DateTime<Utc>) {
        assert_eq!(pending.status(), AbsenceStatus::Pending);
        assert_eq!(pending.processed_date(), None);
        assert_eq!(pending.submission_date(), now);
        assert_eq!(pending.version(), Version::initial());
    }

    #[rstest]
    fn test_新規作成はfrom_dbの復元結果と一致する(pending: Absence) {
        let restored = Absence::from_db(pending.to_record()).unwrap();

        assert_eq!(restored, pending);
    }

    #[rstest]
    #[case(AbsenceStatus::Pending, AbsenceStatus::Approved)]
    #[case(AbsenceStatus::Pending, AbsenceStatus::Rejected)]
    #[case(AbsenceStatus::Pending, AbsenceStatus::UnderReview)]
    #[case(AbsenceStatus::Pending, AbsenceStatus::AwaitingDocs)]
    #[case(AbsenceStatus::Pending, AbsenceStatus::Expired)]
    #[case(AbsenceStatus::UnderReview, AbsenceStatus::Approved)]
    #[case(AbsenceStatus::UnderReview, AbsenceStatus::Rejected)]
    #[case(AbsenceStatus::UnderReview, AbsenceStatus::Expired)]
    #[case(AbsenceStatus::AwaitingDocs, AbsenceStatus::Approved)]
    #[case(AbsenceStatus::AwaitingDocs, AbsenceStatus::Rejected)]
    #[case(AbsenceStatus::AwaitingDocs, AbsenceStatus::Expired)]
    #[case(AbsenceStatus::Approved, AbsenceStatus::Expired)]
    fn test_遷移表にある遷移は成功し処理日時が設定される(
        #[case] from: AbsenceStatus,
        #[case] to: AbsenceStatus,
        now: DateTime<Utc>,
        later: DateTime<Utc>,
    ) {
        let before = absence_in(from, now);

        let sut = before
            .clone()
            .transitioned(to, ActorRole::Teacher, later)
            .unwrap();

        let expected = Absence::from_db(AbsenceRecord {
            status: to,
            processed_date: Some(later),
            version: before.version().next(),
            ..before.to_record()
        })
        .unwrap();
        assert_eq!(sut, expected);
    }

    #[rstest]
    fn test_遷移表にない遷移はすべてinvalid_transition(now: DateTime<Utc>) {
        for from in AbsenceStatus::ALL {
            for to in AbsenceStatus::ALL {
                if from.can_transition_to(to) {
                    continue;
                }

                let result = absence_in(from, now).transitioned(to, ActorRole::Teacher, now);

                assert_eq!(
                    result,
                    Err(DomainError::InvalidTransition { from, to }),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[rstest]
    fn test_生徒による遷移はunauthorized(pending: Absence, now: DateTime<Utc>) {
        let result = pending.transitioned(AbsenceStatus::Approved, ActorRole::Student, now);

        assert!(matches!(result, Err(DomainError::Unauthorized(_))));
    }

    #[rstest]
    fn test_ロール検査は遷移表検査より先に行われる(now: DateTime<Utc>) {
        let rejected = absence_in(AbsenceStatus::Rejected, now);

        let result = rejected.transitioned(AbsenceStatus::Approved, ActorRole::Student, now);

        assert!(matches!(result, Err(DomainError::Unauthorized(_))));
    }

    #[rstest]
    fn test_審査中から書類待ちへの遷移はinvalid_transition(
        pending: Absence,
        now: DateTime<Utc>,
        later: DateTime<Utc>,
    ) {
        let under_review = pending
            .transitioned(AbsenceStatus::UnderReview, ActorRole::Teacher, now)
            .unwrap();

        let result =
            under_review.transitioned(AbsenceStatus::AwaitingDocs, ActorRole::Teacher, later);

        assert_eq!(
            result,
            Err(DomainError::InvalidTransition {
                from: AbsenceStatus::UnderReview,
                to:   AbsenceStatus::AwaitingDocs,
            })
        );
    }

    #[rstest]
    fn test_遷移のたびに処理日時が更新され提出日時は変わらない(
        pending: Absence,
        now: DateTime<Utc>,
        later: DateTime<Utc>,
    ) {
        let approved = pending
            .transitioned(AbsenceStatus::Approved, ActorRole::Teacher, now)
            .unwrap();
        let expired = approved
            .transitioned(AbsenceStatus::Expired, ActorRole::Teacher, later)
            .unwrap();

        assert_eq!(expired.processed_date(), Some(later));
        assert_eq!(expired.submission_date(), now);
        assert_eq!(expired.version().as_u32(), 3);
    }

    #[rstest]
    fn test_from_db_pendingで処理日時ありはエラー(now: DateTime<Utc>) {
        let result = Absence::from_db(AbsenceRecord {
            processed_date: Some(now),
            ..absence_in(AbsenceStatus::Pending, now).to_record()
        });

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[rstest]
    #[case(AbsenceStatus::AwaitingDocs)]
    #[case(AbsenceStatus::UnderReview)]
    #[case(AbsenceStatus::Approved)]
    #[case(AbsenceStatus::Rejected)]
    #[case(AbsenceStatus::Expired)]
    fn test_from_db_処理済みで処理日時欠損はエラー(
        #[case] status: AbsenceStatus,
        now: DateTime<Utc>,
    ) {
        let result = Absence::from_db(AbsenceRecord {
            processed_date: None,
            ..absence_in(status, now).to_record()
        });

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[rstest]
    fn test_永続化表現のjsonはキャメルケースで記載内容がフラットに並ぶ(pending: Absence) {
        let json = serde_json::to_value(pending.to_record()).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["studentName"], "Max Mustermann");
        assert_eq!(json["submissionDate"], "2023-11-14T22:13:20Z");
        assert!(json["processedDate"].is_null());
    }
}
