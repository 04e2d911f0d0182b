use chrono::NaiveDate;
use serde::Deserialize;

use crate::store::PeriodType;

/// 提交列表查询，productId 可选：带产品查单个产品，不带查整个周期
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuery {
    pub product_id: Option<String>,
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSubmissionRequest {
    pub product_id: String,
    pub field_name: String,
    pub value: String,
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
}
