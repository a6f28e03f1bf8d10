use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::language::{ChatTurn, Language, QueryType};

/// A looked-up word as kept in the learner's local library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub word: String,
    pub meaning: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<QueryType>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_up_history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub points: i64,
    /// Unix milliseconds.
    pub timestamp: i64,
    pub task_id: String,
    pub task_type: String,
}

/// Remote copy of one learner's library, keyed by a free-text username.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryBackup {
    pub username: String,
    pub library: Vec<VocabularyEntry>,
    pub points: Vec<PointsRecord>,
    pub last_backup: DateTime<Utc>,
}

/// Collapses entries sharing an `id`: the last occurrence overwrites the
/// earlier one in place. Entries without an id are kept as they are.
pub fn dedup_by_id<T, F>(items: Vec<T>, id_of: F) -> Vec<T>
where
    F: Fn(&T) -> Option<i64>,
{
    let mut positions: HashMap<i64, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        match id_of(&item) {
            Some(id) => match positions.get(&id) {
                Some(&pos) => out[pos] = item,
                None => {
                    positions.insert(id, out.len());
                    out.push(item);
                }
            },
            None => out.push(item),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: Option<i64>, word: &str) -> VocabularyEntry {
        VocabularyEntry {
            id,
            word: word.into(),
            meaning: "m".into(),
            language: Language::En,
            query_type: None,
            created_at: Utc::now(),
            follow_up_history: vec![],
        }
    }

    #[test]
    fn test_dedup_last_write_wins_in_place() {
        let items = vec![
            entry(Some(1), "first"),
            entry(Some(2), "second"),
            entry(Some(1), "first-updated"),
        ];
        let out = dedup_by_id(items, |e| e.id);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].word, "first-updated");
        assert_eq!(out[1].word, "second");
    }

    #[test]
    fn test_dedup_keeps_entries_without_id() {
        let items = vec![entry(None, "a"), entry(None, "a")];
        assert_eq!(dedup_by_id(items, |e| e.id).len(), 2);
    }

    #[test]
    fn test_entry_deserializes_client_shape() {
        let json = r#"{
            "id": 7,
            "word": "Fernweh",
            "meaning": "longing for far-off places",
            "language": "de",
            "queryType": "definition",
            "createdAt": "2025-04-10T12:00:00Z",
            "followUpHistory": [{"question": "Plural?", "answer": "none"}]
        }"#;
        let parsed: VocabularyEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.language, Language::De);
        assert_eq!(parsed.follow_up_history.len(), 1);
    }
}
