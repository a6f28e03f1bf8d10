//! Library backup and restore, one backup per username.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::DocumentStore;
use crate::errors::AppError;
use crate::models::library::{dedup_by_id, LibraryBackup, PointsRecord, VocabularyEntry};
use crate::normalize::fields::non_blank;

#[derive(Debug, Deserialize)]
pub struct BackupRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub library: Vec<VocabularyEntry>,
    #[serde(default)]
    pub points: Vec<PointsRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSummary {
    pub timestamp: DateTime<Utc>,
    pub item_count: usize,
}

impl From<&LibraryBackup> for BackupSummary {
    fn from(backup: &LibraryBackup) -> Self {
        Self {
            timestamp: backup.last_backup,
            item_count: backup.library.len(),
        }
    }
}

/// Overwrites the user's backup with a de-duplicated copy of the library.
pub async fn backup(
    store: &dyn DocumentStore,
    request: BackupRequest,
) -> Result<BackupSummary, AppError> {
    let username = non_blank(request.username)
        .map(|u| u.trim().to_string())
        .ok_or_else(|| AppError::validation("Username cannot be empty"))?;
    if request.library.is_empty() {
        return Err(AppError::validation("No library data found to backup"));
    }

    let backup = LibraryBackup {
        username,
        library: dedup_by_id(request.library, |e| e.id),
        points: dedup_by_id(request.points, |p| p.id),
        last_backup: Utc::now(),
    };
    store.put_backup(&backup).await?;

    info!(
        username = %backup.username,
        items = backup.library.len(),
        points = backup.points.len(),
        "library backed up"
    );
    Ok(BackupSummary::from(&backup))
}

pub async fn restore(store: &dyn DocumentStore, username: &str) -> Result<LibraryBackup, AppError> {
    store
        .get_backup(username.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("No backup found for this user".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::language::Language;

    fn entry(id: i64, word: &str) -> VocabularyEntry {
        VocabularyEntry {
            id: Some(id),
            word: word.into(),
            meaning: format!("meaning of {word}"),
            language: Language::En,
            query_type: None,
            created_at: Utc::now(),
            follow_up_history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_backup_then_restore() {
        let store = MemoryStore::default();
        let summary = backup(
            &store,
            BackupRequest {
                username: Some(" anna ".into()),
                library: vec![entry(1, "serendipity"), entry(2, "Fernweh"), entry(1, "serendipity!")],
                points: Vec::new(),
            },
        )
        .await
        .unwrap();
        assert_eq!(summary.item_count, 2);

        let restored = restore(&store, "anna").await.unwrap();
        assert_eq!(restored.library.len(), 2);
        assert_eq!(restored.library[0].word, "serendipity!");
    }

    #[tokio::test]
    async fn test_backup_overwrites_previous() {
        let store = MemoryStore::default();
        for words in [vec!["a", "b", "c"], vec!["d"]] {
            let library = words
                .iter()
                .enumerate()
                .map(|(i, w)| entry(i as i64, w))
                .collect();
            backup(
                &store,
                BackupRequest {
                    username: Some("ben".into()),
                    library,
                    points: Vec::new(),
                },
            )
            .await
            .unwrap();
        }
        let restored = restore(&store, "ben").await.unwrap();
        assert_eq!(restored.library.len(), 1);
        assert_eq!(restored.library[0].word, "d");
    }

    #[tokio::test]
    async fn test_backup_validation() {
        let store = MemoryStore::default();
        let err = backup(
            &store,
            BackupRequest {
                username: Some("  ".into()),
                library: vec![entry(1, "x")],
                points: Vec::new(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Username cannot be empty");

        let err = backup(
            &store,
            BackupRequest {
                username: Some("cleo".into()),
                library: Vec::new(),
                points: Vec::new(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "No library data found to backup");
    }

    #[tokio::test]
    async fn test_restore_unknown_user() {
        let store = MemoryStore::default();
        let err = restore(&store, "nobody").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
