use askama::Template;
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use cookie_session::{AuthCoordinator, IdentitySlot, LoginOutcome};

use crate::config::{COOKIE_SESSION_LOGIN_URL, COOKIE_SESSION_REDIRECT_USER};
use crate::error::IntoResponseError;
use crate::halt::{halt_and_redirect, safe_next};
use crate::session::AuthUser as User;

#[derive(Template)]
#[template(path = "login.j2", escape = "html")]
struct LoginTemplate<'a> {
    message: &'a str,
    username: &'a str,
    next: &'a str,
    login_url: &'a str,
}

#[derive(Deserialize)]
pub(super) struct NextQuery {
    next: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    next: Option<String>,
}

fn render_login(
    message: &str,
    username: &str,
    next: Option<&str>,
) -> Result<Response, (StatusCode, String)> {
    let template = LoginTemplate {
        message,
        username,
        next: next.unwrap_or_default(),
        login_url: COOKIE_SESSION_LOGIN_URL.as_str(),
    };
    let html = Html(
        template
            .render()
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
    );
    Ok(html.into_response())
}

pub(super) async fn login(
    user: Option<User>,
    Query(query): Query<NextQuery>,
) -> Result<Response, (StatusCode, String)> {
    match user {
        Some(_) => {
            let target = safe_next(query.next.as_deref(), COOKIE_SESSION_REDIRECT_USER.as_str());
            Ok(Redirect::to(target).into_response())
        }
        None => render_login("", "", query.next.as_deref()),
    }
}

pub(super) async fn login_submit(
    State(coordinator): State<AuthCoordinator>,
    Form(form): Form<LoginForm>,
) -> Result<Response, (StatusCode, String)> {
    let mut slot = IdentitySlot::new();

    match coordinator
        .login(&mut slot, &form.username, &form.password)
        .await
        .into_response_error()?
    {
        LoginOutcome::Halt(halt) => {
            let target = safe_next(form.next.as_deref(), COOKIE_SESSION_REDIRECT_USER.as_str());
            halt_and_redirect(halt, target)
        }
        LoginOutcome::Rejected(rejection) => {
            render_login(rejection.message(), &form.username, form.next.as_deref())
        }
    }
}
