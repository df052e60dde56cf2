use crate::error::{AppError, Result};
use crate::model::{CreateLinkRequest, CreateLinkResponse, LinkResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use jiff::Timestamp;
use linky_core::Slug;

pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateLinkRequest>,
) -> Result<Json<CreateLinkResponse>> {
    state.authorize(&headers)?;

    let created = state
        .engine()
        .create(request.into(), Timestamp::now())
        .await?;
    Ok(Json(created.into()))
}

pub async fn list_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<LinkResponse>>> {
    state.authorize(&headers)?;
    let privileged = state.is_privileged(&headers).await?;

    let views = state.engine().list(Timestamp::now(), privileged).await?;
    Ok(Json(views.into_iter().map(LinkResponse::from).collect()))
}

pub async fn get_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LinkResponse>> {
    state.authorize(&headers)?;
    let privileged = state.is_privileged(&headers).await?;

    let view = state
        .engine()
        .inspect(&Slug::new_unchecked(slug), Timestamp::now(), privileged)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(view.into()))
}

pub async fn delete_link_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    state.authorize(&headers)?;
    let privileged = state.is_privileged(&headers).await?;

    state
        .engine()
        .remove(&Slug::new_unchecked(slug), privileged)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
