/// Cookie-backed sessions
///
/// The session cookie carries a signed token naming the authenticated user
/// (see `cabinet_shared::auth::session`). Document routes sit behind
/// [`require_session`], which resolves the cookie to a [`CabinetContext`]
/// and hands it to the handler through request extensions:
///
/// ```text
/// Anonymous ──login──▶ Authenticated
///     ▲                     │
///     └──logout / invalid / expired token
/// ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use cabinet_shared::{
    auth::session::{current_user as token_user, issue_session_token},
    models::user::User,
    storage::NamespaceId,
};
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::warn;

use crate::{
    app::AppState,
    error::{WebError, WebResult},
};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "cabinet_session";

/// Identity resolved for an authenticated request
#[derive(Debug, Clone)]
pub struct CabinetContext {
    /// The signed-in user
    pub user: User,

    /// Storage namespace of that user
    pub namespace: NamespaceId,
}

/// Starts a session for `username` by setting the session cookie
pub fn login(cookies: &Cookies, state: &AppState, username: &str) -> WebResult<()> {
    let token = issue_session_token(
        username,
        state.session_secret(),
        state.config.session.ttl_hours,
    )?;

    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(state.config.server.production);
    cookies.add(cookie);

    Ok(())
}

/// Username of the current session, if the cookie holds a valid token
pub fn current_user(cookies: &Cookies, state: &AppState) -> Option<String> {
    let cookie = cookies.get(SESSION_COOKIE)?;
    token_user(cookie.value(), state.session_secret())
}

/// Ends the session by removing the cookie
pub fn logout(cookies: &Cookies) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// Middleware guarding document routes
///
/// Anonymous requests, invalid tokens, and tokens for users that no
/// longer exist all redirect to `/login`.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let username = current_user(&cookies, &state).ok_or(WebError::Unauthenticated)?;

    let Some(user) = User::find_by_username(&state.db, &username).await? else {
        warn!(username = %username, "Session refers to unknown user");
        logout(&cookies);
        return Err(WebError::Unauthenticated);
    };

    let namespace = user
        .namespace_id()
        .ok_or_else(|| WebError::Internal(format!("Malformed namespace for user {}", user.id)))?;

    req.extensions_mut().insert(CabinetContext { user, namespace });

    Ok(next.run(req).await)
}
