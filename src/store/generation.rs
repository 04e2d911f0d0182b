use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::keys;
use crate::store::submission::PeriodType;

/// 未传限制时的默认条数
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// 幻灯片生成任务记录，只追加创建，状态原地变更，从不删除
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckGeneration {
    pub id: String,
    pub generated_by: String,
    pub period_type: PeriodType,
    pub period_start: chrono::NaiveDate,
    pub slides_url: Option<String>,
    pub status: GenerationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct GenerationDraft {
    pub generated_by: String,
    pub period_type: PeriodType,
    pub period_start: chrono::NaiveDate,
    pub status: GenerationStatus,
}

/// 合并更新的输入，只有提供的字段会变化
#[derive(Debug, Default)]
pub struct GenerationPatch {
    pub status: Option<GenerationStatus>,
    pub slides_url: Option<String>,
}

#[derive(Default)]
pub struct DeckGenerationStore {
    inner: RwLock<HashMap<String, DeckGeneration>>,
}

impl DeckGenerationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, DeckGeneration>> {
        self.inner.read().expect("generation store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, DeckGeneration>> {
        self.inner.write().expect("generation store lock poisoned")
    }

    /// 分配ID和创建时间，初始状态由调用方给定
    pub fn create(&self, draft: GenerationDraft) -> DeckGeneration {
        let record = DeckGeneration {
            id: Uuid::new_v4().to_string(),
            generated_by: draft.generated_by,
            period_type: draft.period_type,
            period_start: draft.period_start,
            slides_url: None,
            status: draft.status,
            created_at: Utc::now(),
        };
        self.write()
            .insert(keys::generation_key(&record.id), record.clone());
        record
    }

    pub fn update(&self, generation_id: &str, patch: GenerationPatch) -> Option<DeckGeneration> {
        let mut map = self.write();
        let record = map.get_mut(&keys::generation_key(generation_id))?;
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(slides_url) = patch.slides_url {
            record.slides_url = Some(slides_url);
        }
        Some(record.clone())
    }

    pub fn get(&self, generation_id: &str) -> Option<DeckGeneration> {
        self.read().get(&keys::generation_key(generation_id)).cloned()
    }

    /// 按创建时间倒序截断
    pub fn list_recent(&self, limit: Option<usize>) -> Vec<DeckGeneration> {
        let mut records: Vec<DeckGeneration> = self.read().values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit.unwrap_or(DEFAULT_RECENT_LIMIT));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(generated_by: &str) -> GenerationDraft {
        GenerationDraft {
            generated_by: generated_by.to_string(),
            period_type: PeriodType::Weekly,
            period_start: "2025-01-06".parse().unwrap(),
            status: GenerationStatus::Pending,
        }
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let store = DeckGenerationStore::new();
        let created = store.create(draft("admin@x.com"));
        assert_eq!(created.status, GenerationStatus::Pending);
        assert!(created.slides_url.is_none());

        let updated = store
            .update(
                &created.id,
                GenerationPatch {
                    status: Some(GenerationStatus::Completed),
                    slides_url: Some("https://decks.internal/decks/x.pdf".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.status, GenerationStatus::Completed);
        assert_eq!(updated.generated_by, "admin@x.com");

        // 只改状态时URL保持不变
        let again = store
            .update(
                &created.id,
                GenerationPatch {
                    status: Some(GenerationStatus::Failed),
                    slides_url: None,
                },
            )
            .unwrap();
        assert_eq!(
            again.slides_url.as_deref(),
            Some("https://decks.internal/decks/x.pdf")
        );
    }

    #[test]
    fn update_unknown_id_returns_none() {
        let store = DeckGenerationStore::new();
        assert!(store.update("missing", GenerationPatch::default()).is_none());
    }

    #[test]
    fn list_recent_truncates_and_orders_newest_first() {
        let store = DeckGenerationStore::new();
        let mut ids = Vec::new();
        for i in 0..15 {
            ids.push(store.create(draft(&format!("user{}@x.com", i))).id);
            // 拉开创建时间，排序断言不依赖时钟精度
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let recent = store.list_recent(Some(5));
        assert_eq!(recent.len(), 5);
        for pair in recent.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        // 最新创建的排在最前
        assert_eq!(recent[0].id, *ids.last().unwrap());

        // 默认限制为10
        assert_eq!(store.list_recent(None).len(), DEFAULT_RECENT_LIMIT);
    }
}
