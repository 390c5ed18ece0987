//! # InMemoryAbsenceRepository
//!
//! プロセス内メモリに欠席届を保持するリポジトリ。
//! 再起動でデータは失われる。開発用途とユースケーステストで使用する。

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use absenz_domain::{
    absence::{Absence, AbsenceId},
    value_objects::Version,
};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::AbsenceRepository;
use crate::error::InfraError;

#[derive(Clone, Default)]
pub struct InMemoryAbsenceRepository {
    absences: Arc<Mutex<Vec<Absence>>>,
    last_id:  Arc<AtomicI64>,
}

impl InMemoryAbsenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AbsenceRepository for InMemoryAbsenceRepository {
    async fn next_id(&self) -> Result<AbsenceId, InfraError> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        AbsenceId::new(id).map_err(|e| InfraError::unexpected(e.to_string()))
    }

    async fn insert(&self, absence: &Absence) -> Result<(), InfraError> {
        self.absences.lock().await.push(absence.clone());
        Ok(())
    }

    async fn update_with_version_check(
        &self,
        absence: &Absence,
        expected_version: Version,
    ) -> Result<(), InfraError> {
        let mut absences = self.absences.lock().await;
        match absences.iter_mut().find(|a| a.id() == absence.id()) {
            Some(stored) if stored.version() == expected_version => {
                *stored = absence.clone();
                Ok(())
            }
            _ => Err(InfraError::conflict("Absence", absence.id().to_string())),
        }
    }

    async fn find_by_id(&self, id: &AbsenceId) -> Result<Option<Absence>, InfraError> {
        Ok(self
            .absences
            .lock()
            .await
            .iter()
            .find(|a| a.id() == *id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Absence>, InfraError> {
        Ok(self.absences.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use absenz_domain::{absence::AbsenceStatus, role::ActorRole};
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::repository::test_support::new_absence;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_next_idは1から連番で払い出す() {
        let sut = InMemoryAbsenceRepository::new();

        assert_eq!(sut.next_id().await.unwrap().as_i64(), 1);
        assert_eq!(sut.next_id().await.unwrap().as_i64(), 2);
    }

    #[tokio::test]
    async fn test_find_allは登録順で返す() {
        let sut = InMemoryAbsenceRepository::new();
        for _ in 0..3 {
            let id = sut.next_id().await.unwrap();
            sut.insert(&new_absence(id, now())).await.unwrap();
        }

        let ids: Vec<i64> = sut
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|a| a.id().as_i64())
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_バージョン一致なら更新できる() {
        let sut = InMemoryAbsenceRepository::new();
        let absence = new_absence(sut.next_id().await.unwrap(), now());
        sut.insert(&absence).await.unwrap();

        let expected_version = absence.version();
        let approved = absence
            .transitioned(AbsenceStatus::Approved, ActorRole::Teacher, now())
            .unwrap();
        sut.update_with_version_check(&approved, expected_version)
            .await
            .unwrap();

        let stored = sut.find_by_id(&approved.id()).await.unwrap().unwrap();
        assert_eq!(stored, approved);
    }

    #[tokio::test]
    async fn test_古いバージョンでの更新はconflict() {
        let sut = InMemoryAbsenceRepository::new();
        let absence = new_absence(sut.next_id().await.unwrap(), now());
        sut.insert(&absence).await.unwrap();

        let first = absence
            .clone()
            .transitioned(AbsenceStatus::UnderReview, ActorRole::Teacher, now())
            .unwrap();
        sut.update_with_version_check(&first, absence.version())
            .await
            .unwrap();

        let second = absence
            .clone()
            .transitioned(AbsenceStatus::Rejected, ActorRole::Teacher, now())
            .unwrap();
        let result = sut
            .update_with_version_check(&second, absence.version())
            .await;

        assert!(result.unwrap_err().as_conflict().is_some());
        let stored = sut.find_by_id(&absence.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), AbsenceStatus::UnderReview);
    }

    #[tokio::test]
    async fn test_存在しないidはnoneを返す() {
        let sut = InMemoryAbsenceRepository::new();

        let result = sut.find_by_id(&AbsenceId::new(99).unwrap()).await.unwrap();

        assert!(result.is_none());
    }
}
