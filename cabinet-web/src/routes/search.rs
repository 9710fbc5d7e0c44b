/// Content search
///
/// `GET /search?query=q` lists the caller's files whose text contains `q`,
/// ignoring case. A missing query behaves like an empty one and matches
/// every file.

use crate::{app::AppState, error::WebResult, middleware::session::CabinetContext, templates};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

pub async fn search(
    State(state): State<AppState>,
    Extension(ctx): Extension<CabinetContext>,
    Query(params): Query<SearchParams>,
) -> WebResult<Response> {
    let matches = state.files.search(&ctx.namespace, &params.query).await?;

    debug!(user_id = %ctx.user.id, hits = matches.len(), "Search completed");
    Ok(templates::search_page(&params.query, &matches).into_response())
}
