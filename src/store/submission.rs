use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub product_id: String,
    pub field_name: String,
    /// 字符串编码的标量值，类型校验是HTTP边界的职责
    pub value: String,
    /// 最后一次写入者的邮箱
    pub user_email: String,
    /// 键不包含周期类型，仅作为元数据随记录保存
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SubmissionDraft {
    pub product_id: String,
    pub field_name: String,
    pub value: String,
    pub user_email: String,
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
}

/// 提交记录存储，键为 `submission:<productId>:<fieldName>:<periodStart>`
#[derive(Default)]
pub struct SubmissionStore {
    inner: RwLock<HashMap<String, Submission>>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Submission>> {
        self.inner.read().expect("submission store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Submission>> {
        self.inner.write().expect("submission store lock poisoned")
    }

    /// 按派生键整体覆盖写入
    ///
    /// 存在性检查和写入在同一临界区内：已有记录保留原ID，其余字段全部取自
    /// 本次草稿，不做字段级合并
    pub fn upsert(&self, draft: SubmissionDraft) -> Submission {
        let key = keys::submission_key(&draft.product_id, &draft.field_name, draft.period_start);
        let mut map = self.write();

        let id = match map.get(&key) {
            Some(existing) => existing.id.clone(),
            None => Uuid::new_v4().to_string(),
        };
        let record = Submission {
            id,
            product_id: draft.product_id,
            field_name: draft.field_name,
            value: draft.value,
            user_email: draft.user_email,
            period_type: draft.period_type,
            period_start: draft.period_start,
            updated_at: Utc::now(),
        };
        map.insert(key, record.clone());

        record
    }

    pub fn get(
        &self,
        product_id: &str,
        field_name: &str,
        period_start: NaiveDate,
    ) -> Option<Submission> {
        self.read()
            .get(&keys::submission_key(product_id, field_name, period_start))
            .cloned()
    }

    /// 按产品和周期精确过滤
    pub fn list_by_product(
        &self,
        product_id: &str,
        period_type: PeriodType,
        period_start: NaiveDate,
    ) -> Vec<Submission> {
        self.read()
            .values()
            .filter(|s| {
                s.product_id == product_id
                    && s.period_type == period_type
                    && s.period_start == period_start
            })
            .cloned()
            .collect()
    }

    /// 拉取整个周期的全部提交
    pub fn list_by_period(&self, period_type: PeriodType, period_start: NaiveDate) -> Vec<Submission> {
        self.read()
            .values()
            .filter(|s| s.period_type == period_type && s.period_start == period_start)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn draft(value: &str, user_email: &str) -> SubmissionDraft {
        SubmissionDraft {
            product_id: "sams".to_string(),
            field_name: "kr1_tof_actual".to_string(),
            value: value.to_string(),
            user_email: user_email.to_string(),
            period_type: PeriodType::Weekly,
            period_start: date("2025-01-06"),
        }
    }

    #[test]
    fn repeated_upsert_preserves_id_and_takes_latest_value() {
        let store = SubmissionStore::new();
        let first = store.upsert(draft("100", "a@x.com"));
        let second = store.upsert(draft("250", "b@x.com"));

        assert_eq!(second.id, first.id);
        assert_eq!(second.value, "250");
        assert_eq!(second.user_email, "b@x.com");
        assert!(second.updated_at >= first.updated_at);

        let stored = store
            .get("sams", "kr1_tof_actual", date("2025-01-06"))
            .unwrap();
        assert_eq!(stored.value, "250");
        // 覆盖写不产生重复记录
        assert_eq!(
            store
                .list_by_period(PeriodType::Weekly, date("2025-01-06"))
                .len(),
            1
        );
    }

    #[test]
    fn distinct_keys_create_distinct_records() {
        let store = SubmissionStore::new();
        let a = store.upsert(draft("100", "a@x.com"));
        let b = store.upsert(SubmissionDraft {
            field_name: "kr2_adoption".to_string(),
            ..draft("7", "a@x.com")
        });

        assert_ne!(a.id, b.id);
        assert_eq!(
            store
                .list_by_product("sams", PeriodType::Weekly, date("2025-01-06"))
                .len(),
            2
        );
    }

    #[test]
    fn period_type_does_not_partition_the_key() {
        let store = SubmissionStore::new();
        let weekly = store.upsert(draft("100", "a@x.com"));
        let monthly = store.upsert(SubmissionDraft {
            period_type: PeriodType::Monthly,
            ..draft("900", "a@x.com")
        });

        // 同一 (产品, 字段, 起始日) 不同周期类型写入同一条记录
        assert_eq!(monthly.id, weekly.id);
        let stored = store
            .get("sams", "kr1_tof_actual", date("2025-01-06"))
            .unwrap();
        assert_eq!(stored.period_type, PeriodType::Monthly);
        assert_eq!(stored.value, "900");
    }

    #[test]
    fn list_filters_are_exact_match() {
        let store = SubmissionStore::new();
        store.upsert(draft("100", "a@x.com"));
        store.upsert(SubmissionDraft {
            product_id: "stigviewer".to_string(),
            ..draft("5", "a@x.com")
        });

        let sams = store.list_by_product("sams", PeriodType::Weekly, date("2025-01-06"));
        assert_eq!(sams.len(), 1);
        assert_eq!(sams[0].product_id, "sams");

        assert!(
            store
                .list_by_product("sams", PeriodType::Weekly, date("2025-01-13"))
                .is_empty()
        );
        assert_eq!(
            store
                .list_by_period(PeriodType::Weekly, date("2025-01-06"))
                .len(),
            2
        );
    }
}
