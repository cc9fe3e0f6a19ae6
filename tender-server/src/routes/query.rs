use axum::{Json, extract::State};

use tender_model::{QueryRequest, QueryResult};

use crate::errors::ApiResult;
use crate::routes::AppState;

/// `POST /api/query`.
///
/// A missing `text` field reaches the gateway as an empty string and comes
/// back as the 400 the contract requires.
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> ApiResult<Json<QueryResult>> {
    let text = request.text.unwrap_or_default();
    let result = state.gateway.execute(&text, &request.params).await?;
    Ok(Json(result))
}
