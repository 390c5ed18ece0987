//! # JsonFileAbsenceRepository
//!
//! 欠席届を 1 つの JSON ファイル（配列）に保存するリポジトリ。
//!
//! ## ファイル形式
//!
//! ```json
//! [
//!   { "id": 1, "studentName": "Max Mustermann", "status": "pending", ... }
//! ]
//! ```
//!
//! - 書き込みはファイル全体の読み込み → 変更 → 書き出しで行い、プロセス内ではミューテックスで直列化する
//! - 書き出しは一時ファイルへ書いてから rename する
//! - ファイルが存在しない場合は空のストアとして扱う

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicI64, Ordering},
};

use absenz_domain::{
    absence::{Absence, AbsenceId, AbsenceRecord},
    value_objects::Version,
};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::AbsenceRepository;
use crate::error::InfraError;

pub struct JsonFileAbsenceRepository {
    path:    PathBuf,
    lock:    Mutex<()>,
    last_id: AtomicI64,
}

impl JsonFileAbsenceRepository {
    /// ファイルを開いてリポジトリを作成する
    ///
    /// 既存ファイルの最大 ID から採番を再開する。
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, InfraError> {
        let path = path.into();
        let absences = read_all(&path).await?;
        let last_id = absences
            .iter()
            .map(|a| a.id().as_i64())
            .max()
            .unwrap_or(0);

        tracing::debug!(path = %path.display(), count = absences.len(), "欠席届ファイルを読み込みました");

        Ok(Self {
            path,
            lock: Mutex::new(()),
            last_id: AtomicI64::new(last_id),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_all(path: &Path) -> Result<Vec<Absence>, InfraError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<AbsenceRecord> = serde_json::from_str(&content)?;
    records
        .into_iter()
        .map(|r| Absence::from_db(r).map_err(|e| InfraError::unexpected(e.to_string())))
        .collect()
}

async fn write_all(path: &Path, absences: &[Absence]) -> Result<(), InfraError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let records: Vec<AbsenceRecord> = absences.iter().map(Absence::to_record).collect();
    let json = serde_json::to_string_pretty(&records)?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl AbsenceRepository for JsonFileAbsenceRepository {
    async fn next_id(&self) -> Result<AbsenceId, InfraError> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        AbsenceId::new(id).map_err(|e| InfraError::unexpected(e.to_string()))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %absence.id()))]
    async fn insert(&self, absence: &Absence) -> Result<(), InfraError> {
        let _guard = self.lock.lock().await;
        let mut absences = read_all(&self.path).await?;
        absences.push(absence.clone());
        write_all(&self.path, &absences).await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %absence.id()))]
    async fn update_with_version_check(
        &self,
        absence: &Absence,
        expected_version: Version,
    ) -> Result<(), InfraError> {
        let _guard = self.lock.lock().await;
        let mut absences = read_all(&self.path).await?;

        let Some(stored) = absences
            .iter_mut()
            .find(|a| a.id() == absence.id() && a.version() == expected_version)
        else {
            return Err(InfraError::conflict("Absence", absence.id().to_string()));
        };
        *stored = absence.clone();

        write_all(&self.path, &absences).await
    }

    async fn find_by_id(&self, id: &AbsenceId) -> Result<Option<Absence>, InfraError> {
        let _guard = self.lock.lock().await;
        let absences = read_all(&self.path).await?;
        Ok(absences.into_iter().find(|a| a.id() == *id))
    }

    async fn find_all(&self) -> Result<Vec<Absence>, InfraError> {
        let _guard = self.lock.lock().await;
        read_all(&self.path).await
    }
}
