use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::ApiResult,
    purchases::repo_types::Purchase,
    state::AppState,
};

pub fn purchase_routes() -> Router<AppState> {
    Router::new().route("/user/purchases", get(list_purchases))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_purchases(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Purchase>>> {
    let rows = state.purchases.list_by_user(user.id).await?;
    debug!(count = rows.len(), "purchases listed");
    Ok(Json(rows))
}
