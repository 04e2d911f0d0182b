use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    middleware::CurrentUser,
    store::{GenerationDraft, GenerationStatus},
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{GenerateDeckRequest, GenerationListQuery};

/// 管理端列表的默认条数
const ADMIN_RECENT_LIMIT: usize = 20;

#[axum::debug_handler]
pub async fn list_generations(
    State(state): State<AppState>,
    Query(query): Query<GenerationListQuery>,
) -> impl IntoResponse {
    let generations = state
        .stores
        .generations
        .list_recent(Some(query.limit.unwrap_or(ADMIN_RECENT_LIMIT)));

    (StatusCode::OK, success_to_api_response(generations))
}

/// 触发一次生成：立即返回pending记录，后台任务推进状态机
#[axum::debug_handler]
pub async fn generate_deck(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<GenerateDeckRequest>,
) -> impl IntoResponse {
    let generation = state.stores.generations.create(GenerationDraft {
        generated_by: current.email,
        period_type: req.period_type,
        period_start: req.period_start,
        status: GenerationStatus::Pending,
    });

    state.deck_worker.dispatch(
        state.stores.clone(),
        generation.id.clone(),
        state.config.deck_render_delay(),
        state.config.deck_base_url.clone(),
    );
    tracing::info!(
        "Deck generation {} dispatched by {}",
        generation.id,
        generation.generated_by
    );

    (StatusCode::CREATED, success_to_api_response(generation))
}

/// 取消在途的生成任务并标记为failed
#[axum::debug_handler]
pub async fn cancel_generation(
    State(state): State<AppState>,
    Path(generation_id): Path<String>,
) -> impl IntoResponse {
    if state.deck_worker.cancel(&state.stores, &generation_id) {
        (
            StatusCode::OK,
            success_to_api_response(serde_json::json!({
                "success": true
            })),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            error_to_api_response(
                error_codes::NOT_FOUND,
                "没有对应的在途生成任务".to_string(),
            ),
        )
    }
}
