use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UniverseQuery {
    #[serde(default, rename = "universeIds")]
    pub universe_ids: Option<String>,
}

pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(games))
        .route("/thumbnails", get(thumbnails))
}

fn universe_ids(query: UniverseQuery) -> ApiResult<String> {
    lazy_static! {
        static ref IDS_RE: Regex = Regex::new(r"^\d+(,\d+)*$").unwrap();
    }
    let ids = query.universe_ids.unwrap_or_default().replace(' ', "");
    if !IDS_RE.is_match(&ids) {
        return Err(ApiError::bad_request("universeIds must be a comma-separated list of ids"));
    }
    Ok(ids)
}

#[instrument(skip(state))]
pub async fn games(
    State(state): State<AppState>,
    Query(query): Query<UniverseQuery>,
) -> ApiResult<Json<Value>> {
    let ids = universe_ids(query)?;
    Ok(Json(state.games.games(&ids).await?))
}

#[instrument(skip(state))]
pub async fn thumbnails(
    State(state): State<AppState>,
    Query(query): Query<UniverseQuery>,
) -> ApiResult<Json<Value>> {
    let ids = universe_ids(query)?;
    Ok(Json(state.games.thumbnails(&ids).await?))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::testing::{body_json, TestHarness};

    async fn get(h: &TestHarness, uri: &str) -> (StatusCode, serde_json::Value) {
        let res = h
            .app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        (status, body_json(res).await)
    }

    #[tokio::test]
    async fn passes_games_payload_through() {
        let h = TestHarness::new();
        let (status, body) = get(&h, "/api/games?universeIds=1,2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], "1,2");

        let (status, body) = get(&h, "/api/thumbnails?universeIds=42").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["targetId"], "42");
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_ids() {
        let h = TestHarness::new();
        for uri in ["/api/games", "/api/games?universeIds=", "/api/thumbnails?universeIds=1;drop"] {
            let (status, body) = get(&h, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string());
        }
    }
}
