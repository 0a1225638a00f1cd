use axum::{
    extract::rejection::QueryRejection,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::modules::repository_charts::adapters::outbound::data_source::DataSourceError;
use crate::modules::repository_charts::core::username::Username;
use crate::modules::repository_charts::use_cases::fetch_repositories::handler::CacheError;
use crate::modules::repository_charts::use_cases::render_chart::chart_request::{
    ChartKind, ChartParams, ChartRequest,
};
use crate::modules::repository_charts::use_cases::render_chart::handler::ApplicationError;
use crate::shell::state::AppState;

pub async fn top_forks(
    state: State<AppState>,
    username: Path<String>,
    params: Result<Query<ChartParams>, QueryRejection>,
) -> Response {
    handle(ChartKind::TopForks, state, username, params).await
}

pub async fn top_stars(
    state: State<AppState>,
    username: Path<String>,
    params: Result<Query<ChartParams>, QueryRejection>,
) -> Response {
    handle(ChartKind::TopStars, state, username, params).await
}

pub async fn bubble_lang(
    state: State<AppState>,
    username: Path<String>,
    params: Result<Query<ChartParams>, QueryRejection>,
) -> Response {
    handle(ChartKind::LanguageBubbles, state, username, params).await
}

async fn handle(
    kind: ChartKind,
    State(state): State<AppState>,
    Path(username): Path<String>,
    params: Result<Query<ChartParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(p) => p,
        Err(e) => return (StatusCode::BAD_REQUEST, e.body_text()).into_response(),
    };
    let username = match Username::parse(&username) {
        Ok(u) => u,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let handler = &state.render_chart;
    let request = match ChartRequest::from_params(kind, params, handler.default_font()) {
        Ok(r) => r,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match handler.handle(&username, &request).await {
        Ok(png) => ([(header::CONTENT_TYPE, "image/png")], png).into_response(),
        Err(e @ ApplicationError::UnknownFont(_)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(ApplicationError::Cache(CacheError::Fetch(DataSourceError::NotFound(user)))) => {
            (StatusCode::NOT_FOUND, format!("GitHub user {user} not found")).into_response()
        }
        Err(ApplicationError::Cache(CacheError::Fetch(e))) => {
            tracing::warn!(%username, error = %e, "data source failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
        Err(e) => {
            tracing::error!(%username, error = %e, "chart request failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
