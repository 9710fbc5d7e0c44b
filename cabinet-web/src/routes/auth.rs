/// Account endpoints
///
/// - `GET /` - Landing page, or the cabinet for a signed-in user
/// - `GET|POST /register` - Create an account
/// - `GET|POST /login` - Start a session
/// - `GET /logout` - End the session
///
/// Failures are reported by re-rendering the form with a message; only
/// infrastructure errors surface as `WebError`.

use crate::{
    app::AppState,
    error::WebResult,
    middleware::session,
    templates,
};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use cabinet_shared::auth::credentials::{self, CredentialError};
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::info;
use validator::{Validate, ValidationErrors};

/// Shown for any failed login, whether or not the username exists
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Shown when registration hits an existing username
pub const USERNAME_TAKEN: &str = "Username already exists";

/// Registration form
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 80, message = "Username must be 1 to 80 characters"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// First validation message, picked in field-name order so the page is
/// stable across runs
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// Landing page
pub async fn index(State(state): State<AppState>, cookies: Cookies) -> Response {
    if session::current_user(&cookies, &state).is_some() {
        return Redirect::to("/cabinet").into_response();
    }
    templates::index_page().into_response()
}

pub async fn register_form() -> impl IntoResponse {
    templates::register_page(None)
}

/// Creates the account and its namespace, then sends the user to log in
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> WebResult<Response> {
    if let Err(e) = form.validate() {
        return Ok(templates::register_page(Some(&first_message(&e))).into_response());
    }

    match credentials::register(&state.db, &state.files, &form.username, &form.password).await {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(CredentialError::UsernameTaken) => {
            Ok(templates::register_page(Some(USERNAME_TAKEN)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form() -> impl IntoResponse {
    templates::login_page(None)
}

/// Verifies credentials and sets the session cookie
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    let user = credentials::authenticate(&state.db, &form.username, &form.password).await?;

    let Some(user) = user else {
        info!(username = %form.username, "Failed login attempt");
        return Ok(templates::login_page(Some(INVALID_CREDENTIALS)).into_response());
    };

    session::login(&cookies, &state, &user.username)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Redirect::to("/cabinet").into_response())
}

/// Clears the session; harmless when already anonymous
pub async fn logout(cookies: Cookies) -> Redirect {
    session::logout(&cookies);
    Redirect::to("/")
}
