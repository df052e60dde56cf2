use crate::auth::bearer_token;
use crate::error::Result;
use crate::model::PasswordForm;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use jiff::Timestamp;
use linky_core::Slug;
use linky_engine::Resolution;

/// `GET /{slug}`. A password may be presented as a bearer token.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let credential = bearer_token(&headers).map(str::to_owned);
    resolve(&state, slug, &headers, credential).await
}

/// `POST /{slug}` from the password prompt.
pub async fn unlock_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<PasswordForm>,
) -> Result<Response> {
    let credential = form.password.filter(|password| !password.is_empty());
    resolve(&state, slug, &headers, credential).await
}

async fn resolve(
    state: &AppState,
    slug: String,
    headers: &HeaderMap,
    credential: Option<String>,
) -> Result<Response> {
    let slug = Slug::new_unchecked(slug);
    let privileged = state.is_privileged(headers).await?;

    let resolution = state
        .engine()
        .resolve(&slug, Timestamp::now(), credential.as_deref(), privileged)
        .await?;

    Ok(match resolution {
        Resolution::NotFound => (StatusCode::NOT_FOUND, "Link not found").into_response(),
        Resolution::Gone => (StatusCode::GONE, "Link has expired").into_response(),
        Resolution::Redirect(url) => (StatusCode::FOUND, [(LOCATION, url)]).into_response(),
        Resolution::Challenge => (StatusCode::OK, password_page(None)).into_response(),
        Resolution::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            password_page(Some("Incorrect password")),
        )
            .into_response(),
    })
}

fn password_page(error: Option<&str>) -> Html<String> {
    let error = error
        .map(|message| format!("<p class=\"error\">{message}</p>"))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Protected link</title></head>
<body>
<h1>Enter password</h1>
{error}<form method="post">
<input type="password" name="password" autofocus required>
<button type="submit">Continue</button>
</form>
</body>
</html>
"#
    ))
}
