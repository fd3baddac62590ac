use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    downloads::services::{blob_location, content_disposition},
    error::{ApiError, ApiResult},
    products::services::is_valid_product_id,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub file: Option<String>,
}

pub fn download_routes() -> Router<AppState> {
    Router::new().route("/download", get(download))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn download(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<Response> {
    let product_id = query.file.unwrap_or_default();
    if product_id.is_empty() {
        return Err(ApiError::bad_request("file parameter is required"));
    }
    if !is_valid_product_id(&product_id) {
        return Err(ApiError::bad_request("Invalid file parameter"));
    }

    let Some(purchase) = state
        .purchases
        .find_for_user_product(user.id, &product_id)
        .await?
    else {
        warn!(product_id = %product_id, "download without purchase");
        return Err(ApiError::not_found("Purchase not found"));
    };

    let product = state.products.get(&product_id).await?;
    let (key, file_name) = blob_location(&product_id, product.as_ref());

    let Some(object) = state.storage.get_object(&key).await? else {
        warn!(product_id = %product_id, key = %key, "purchased file missing from storage");
        return Err(ApiError::not_found("File not found"));
    };

    let stamped = state.purchases.mark_downloaded(purchase.id).await?;
    info!(
        purchase_id = %purchase.id,
        product_id = %product_id,
        bytes = object.body.len(),
        last_download = %stamped,
        "file downloaded"
    );

    let content_type = object
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
        ],
        Body::from(object.body),
    )
        .into_response())
}
