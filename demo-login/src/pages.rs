use askama::Template;
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use cookie_session::AuthCoordinator;
use cookie_session_axum::AuthUser;

#[derive(Template)]
#[template(path = "home.j2", escape = "html")]
struct HomeTemplate<'a> {
    username: &'a str,
    token_prefix: &'a str,
    now: String,
}

#[derive(Template)]
#[template(path = "about.j2", escape = "html")]
struct AboutTemplate<'a> {
    username: &'a str,
}

pub(crate) fn router(coordinator: AuthCoordinator) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .with_state(coordinator)
}

fn render(template: &impl Template) -> Result<Response, (StatusCode, String)> {
    let html = template
        .render()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Html(html).into_response())
}

// Taking AuthUser sends anonymous visitors to the login page
async fn home(user: AuthUser) -> Result<Response, (StatusCode, String)> {
    render(&HomeTemplate {
        username: &user.username,
        token_prefix: user.token_prefix(),
        now: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}

async fn about(user: AuthUser) -> Result<Response, (StatusCode, String)> {
    render(&AboutTemplate {
        username: &user.username,
    })
}
