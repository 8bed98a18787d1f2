use axum::{
    extract::{Query, State},
    Extension, Json,
};
use mnm_news::{classify_all, NewsItem};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) const MAX_COMPANIES: usize = 20;

/// Collect `companies` values, accepting both repeated keys and
/// comma-separated lists. Blank entries are dropped.
fn requested_companies(pairs: &[(String, String)]) -> Vec<String> {
    pairs
        .iter()
        .filter(|(key, _)| key == "companies")
        .flat_map(|(_, value)| value.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub(super) async fn list_news(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<Vec<NewsItem>>>, ApiError> {
    let companies = requested_companies(&pairs);
    if companies.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "at least one company is required",
        ));
    }
    if companies.len() > MAX_COMPANIES {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("at most {MAX_COMPANIES} companies per request"),
        ));
    }

    let records = state.aggregator.aggregate(&companies).await;
    let data = classify_all(state.classifier.as_ref(), &records);
    tracing::info!(
        request_id = req_id.0.as_str(),
        companies = companies.len(),
        items = data.len(),
        "news request served"
    );

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
