use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::models::{FilterTicket, Ticket};

use super::{
    ADMIN_PATH, AppState, LOGIN_PATH,
    auth::{removal_cookie, session_cookie, session_id},
    pages,
    response::{ApiError, PageError},
};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub creator_name: Option<String>,
}

impl ListQuery {
    fn filter(&self) -> FilterTicket {
        FilterTicket::from(self.creator_name.clone())
    }
}

pub async fn login_page(State(state): State<AppState>, cookies: Cookies) -> Response {
    if state.sessions.is_authenticated(&cookies).await {
        return Redirect::to(ADMIN_PATH).into_response();
    }
    Html(pages::login_page(None)).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = &state.auth;
    let configured = !auth.admin_username.is_empty() && !auth.admin_password.is_empty();
    if !configured || form.username != auth.admin_username || form.password != auth.admin_password
    {
        log::warn!("Failed admin login for {:?}", form.username);
        return (
            StatusCode::UNAUTHORIZED,
            Html(pages::login_page(Some("Invalid username or password"))),
        )
            .into_response();
    }

    let id = match state.sessions.create(&form.username).await {
        Ok(id) => id,
        Err(err) => {
            log::error!("Starting session for {}: {err:#}", form.username);
            return (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::ERROR_PAGE)).into_response();
        }
    };
    cookies.add(session_cookie(id));
    log::info!("{} logged in", form.username);
    Redirect::to(ADMIN_PATH).into_response()
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    if let Some(id) = session_id(&cookies) {
        state.sessions.remove(&id).await;
    }
    cookies.remove(removal_cookie());
    Redirect::to(LOGIN_PATH)
}

/// GET /admin
pub async fn listing(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, PageError> {
    let filter = query.filter();
    let tickets = state.search.list(filter.clone()).await?;
    Ok(Html(pages::listing_page(&tickets, filter.creator_name())))
}

/// GET /admin/api/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let tickets = state.search.list(query.filter()).await?;
    Ok(Json(tickets))
}
