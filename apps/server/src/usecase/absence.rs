//! # 欠席届ユースケース
//!
//! 欠席届の提出・ステータス遷移・一覧・取得を実装する。
//!
//! ## ステータス遷移の検査順序
//!
//! 1. 操作者ロール（教員以外は `Forbidden`）
//! 2. 遷移先ステータスのパース（不正値は `BadRequest`）
//! 3. 欠席届の取得（なければ `NotFound`）
//! 4. 遷移表（許可されていなければ `InvalidTransition`）
//!
//! いずれかで失敗した場合、保存済みの欠席届は変更されない。

use std::sync::Arc;

use absenz_domain::{
    absence::{Absence, AbsenceDetails, AbsenceId, AbsenceStatus, NewAbsence},
    clock::Clock,
    role::ActorRole,
};
use absenz_infra::repository::AbsenceRepository;
use absenz_shared::{event_log::event, log_business_event};

use super::helpers::FindResultExt;
use crate::error::CoreError;

/// 欠席届ユースケース実装
pub struct AbsenceUseCaseImpl {
    absence_repo: Arc<dyn AbsenceRepository>,
    clock:        Arc<dyn Clock>,
}

impl AbsenceUseCaseImpl {
    pub fn new(absence_repo: Arc<dyn AbsenceRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            absence_repo,
            clock,
        }
    }

    /// 欠席届を提出する
    ///
    /// 記載内容はそのまま保存し、未処理・処理日時なしで登録する。
    pub async fn create_absence(
        &self,
        details: AbsenceDetails,
        actor: ActorRole,
    ) -> Result<Absence, CoreError> {
        actor.require(ActorRole::Student, "欠席届の提出")?;
        details.validate_presence()?;

        let id = self.absence_repo.next_id().await?;
        let absence = Absence::new(NewAbsence {
            id,
            details,
            now: self.clock.now(),
        });
        self.absence_repo.insert(&absence).await?;

        log_business_event!(
            event.category = event::category::ABSENCE,
            event.action = event::action::ABSENCE_CREATED,
            event.entity_type = event::entity_type::ABSENCE,
            event.entity_id = %absence.id(),
            event.actor_role = %actor,
            event.result = event::result::SUCCESS,
            "欠席届提出"
        );

        Ok(absence)
    }

    /// 欠席届のステータスを遷移させる
    ///
    /// 処理日時にはサーバーの現在時刻を記録する。
    pub async fn transition_absence(
        &self,
        id: i64,
        target_status: &str,
        actor: ActorRole,
    ) -> Result<Absence, CoreError> {
        actor.require(ActorRole::Teacher, "欠席届のステータス変更")?;
        let target: AbsenceStatus = target_status.parse()?;

        let absence = self.find(id).await?;
        let from = absence.status();
        let expected_version = absence.version();

        let transitioned = absence.transitioned(target, actor, self.clock.now())?;
        self.absence_repo
            .update_with_version_check(&transitioned, expected_version)
            .await?;

        log_business_event!(
            event.category = event::category::ABSENCE,
            event.action = event::action::ABSENCE_TRANSITIONED,
            event.entity_type = event::entity_type::ABSENCE,
            event.entity_id = %transitioned.id(),
            event.actor_role = %actor,
            event.from_status = %from,
            event.to_status = %target,
            event.result = event::result::SUCCESS,
            "欠席届ステータス変更"
        );

        Ok(transitioned)
    }

    /// 欠席届を登録順に一覧する
    ///
    /// `filter_status` を指定した場合は現在のステータスが完全一致するものだけを返す。
    /// 空文字列は指定なしとして扱う。
    pub async fn list_absences(
        &self,
        filter_status: Option<&str>,
    ) -> Result<Vec<Absence>, CoreError> {
        let filter = filter_status
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<AbsenceStatus>)
            .transpose()?;

        let absences = self.absence_repo.find_all().await?;

        Ok(match filter {
            Some(status) => absences
                .into_iter()
                .filter(|a| a.status() == status)
                .collect(),
            None => absences,
        })
    }

    /// 欠席届を 1 件取得する
    pub async fn get_absence(&self, id: i64) -> Result<Absence, CoreError> {
        self.find(id).await
    }

    async fn find(&self, id: i64) -> Result<Absence, CoreError> {
        // 0 以下の ID は存在し得ないため NotFound として扱う
        let Ok(absence_id) = AbsenceId::new(id) else {
            return Err(CoreError::NotFound("欠席届が見つかりません".to_string()));
        };
        self.absence_repo
            .find_by_id(&absence_id)
            .await
            .or_not_found("欠席届")
    }
}
