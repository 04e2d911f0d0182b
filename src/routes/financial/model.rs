use chrono::NaiveDate;
use serde::Deserialize;

/// 月度财务数字，periodStart 落在哪个自然月就写入哪条记录
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertFinancialRequest {
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
}
