use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::store::keys;

/// 月度财务记录，按 periodStart 所在自然月归并
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub revenue: f64,
    pub cost_of_goods_sold: f64,
    pub gross_profit: f64,
    pub operating_expenses: f64,
    pub net_income: f64,
    pub cash_on_hand: f64,
    pub accounts_receivable: f64,
    pub accounts_payable: f64,
    pub updated_at: DateTime<Utc>,
    /// 最后一次写入者的邮箱
    pub updated_by: String,
}

#[derive(Debug)]
pub struct FinancialDraft {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub revenue: f64,
    pub cost_of_goods_sold: f64,
    pub gross_profit: f64,
    pub operating_expenses: f64,
    pub net_income: f64,
    pub cash_on_hand: f64,
    pub accounts_receivable: f64,
    pub accounts_payable: f64,
    pub updated_by: String,
}

/// 财务记录存储，键为 `financial:<YYYY-MM>`
#[derive(Default)]
pub struct FinancialStore {
    inner: RwLock<HashMap<String, FinancialRecord>>,
}

impl FinancialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, FinancialRecord>> {
        self.inner.read().expect("financial store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, FinancialRecord>> {
        self.inner.write().expect("financial store lock poisoned")
    }

    /// 按月键整体覆盖写入，已有记录保留原ID
    pub fn upsert(&self, draft: FinancialDraft) -> FinancialRecord {
        let key = keys::financial_key(draft.period_start);
        let mut map = self.write();

        let id = match map.get(&key) {
            Some(existing) => existing.id.clone(),
            None => Uuid::new_v4().to_string(),
        };
        let record = FinancialRecord {
            id,
            period_start: draft.period_start,
            period_end: draft.period_end,
            revenue: draft.revenue,
            cost_of_goods_sold: draft.cost_of_goods_sold,
            gross_profit: draft.gross_profit,
            operating_expenses: draft.operating_expenses,
            net_income: draft.net_income,
            cash_on_hand: draft.cash_on_hand,
            accounts_receivable: draft.accounts_receivable,
            accounts_payable: draft.accounts_payable,
            updated_at: Utc::now(),
            updated_by: draft.updated_by,
        };
        map.insert(key, record.clone());

        record
    }

    /// 按 `YYYY-MM` 月份查询
    pub fn get(&self, year_month: &str) -> Option<FinancialRecord> {
        self.read()
            .get(&keys::financial_month_key(year_month))
            .cloned()
    }

    /// 全量列表，最近的月份在前
    pub fn list_all(&self) -> Vec<FinancialRecord> {
        let mut records: Vec<FinancialRecord> = self.read().values().cloned().collect();
        records.sort_by(|a, b| b.period_start.cmp(&a.period_start));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn draft(period_start: &str, revenue: f64) -> FinancialDraft {
        FinancialDraft {
            period_start: date(period_start),
            period_end: date("2025-01-31"),
            revenue,
            cost_of_goods_sold: 40_000.0,
            gross_profit: revenue - 40_000.0,
            operating_expenses: 30_000.0,
            net_income: revenue - 70_000.0,
            cash_on_hand: 500_000.0,
            accounts_receivable: 25_000.0,
            accounts_payable: 12_000.0,
            updated_by: "cfo@x.com".to_string(),
        }
    }

    #[test]
    fn same_month_dates_collapse_into_one_record() {
        let store = FinancialStore::new();
        let first = store.upsert(draft("2025-01-06", 100_000.0));
        let second = store.upsert(draft("2025-01-31", 120_000.0));

        assert_eq!(second.id, first.id);
        assert_eq!(store.list_all().len(), 1);

        let stored = store.get("2025-01").unwrap();
        assert_eq!(stored.revenue, 120_000.0);
        // 整体覆盖：periodStart 也来自最后一次写入
        assert_eq!(stored.period_start, date("2025-01-31"));
    }

    #[test]
    fn different_months_stay_separate() {
        let store = FinancialStore::new();
        let jan = store.upsert(draft("2025-01-06", 100_000.0));
        let feb = store.upsert(draft("2025-02-03", 110_000.0));

        assert_ne!(jan.id, feb.id);
        assert!(store.get("2025-01").is_some());
        assert!(store.get("2025-02").is_some());
    }

    #[test]
    fn list_all_sorts_most_recent_first() {
        let store = FinancialStore::new();
        store.upsert(draft("2025-01-06", 1.0));
        store.upsert(draft("2025-03-03", 3.0));
        store.upsert(draft("2025-02-03", 2.0));

        let months: Vec<String> = store
            .list_all()
            .iter()
            .map(|r| r.period_start.format("%Y-%m").to_string())
            .collect();
        assert_eq!(months, vec!["2025-03", "2025-02", "2025-01"]);
    }
}
