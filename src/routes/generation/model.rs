use chrono::NaiveDate;
use serde::Deserialize;

use crate::store::PeriodType;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDeckRequest {
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct GenerationListQuery {
    pub limit: Option<usize>,
}
