use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    middleware::CurrentUser,
    store::FinancialDraft,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::UpsertFinancialRequest;

/// 全量列表，最近的月份在前
#[axum::debug_handler]
pub async fn list_financials(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        success_to_api_response(state.stores.financials.list_all()),
    )
}

#[axum::debug_handler]
pub async fn upsert_financial(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpsertFinancialRequest>,
) -> impl IntoResponse {
    if req.period_end < req.period_start {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response(
                error_codes::VALIDATION_ERROR,
                "periodEnd 不能早于 periodStart".to_string(),
            ),
        );
    }

    let record = state.stores.financials.upsert(FinancialDraft {
        period_start: req.period_start,
        period_end: req.period_end,
        revenue: req.revenue,
        cost_of_goods_sold: req.cost_of_goods_sold,
        gross_profit: req.gross_profit,
        operating_expenses: req.operating_expenses,
        net_income: req.net_income,
        cash_on_hand: req.cash_on_hand,
        accounts_receivable: req.accounts_receivable,
        accounts_payable: req.accounts_payable,
        updated_by: current.email,
    });

    (StatusCode::OK, success_to_api_response(record))
}
