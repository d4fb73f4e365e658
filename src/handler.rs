use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{
        header::{HeaderName, LOCATION, SET_COOKIE},
        StatusCode,
    },
    response::{Html, IntoResponse, Response},
    Extension, Form, Json,
};
use serde_json::json;

use crate::{
    error::{Error, Result},
    middleware::{clear_session_cookie, session_cookie},
    model::User,
    schema::{CreateTodoForm, CredentialsForm, Pagination, TokenResponse, UpdateTodoForm},
    view, AppState,
};

pub async fn home() -> Html<String> {
    Html(view::home())
}

pub async fn login_page() -> Html<String> {
    Html(view::login())
}

pub async fn register_page() -> Html<String> {
    Html(view::register())
}

// 302 Found with a Location header
fn found(location: &'static str) -> (StatusCode, [(HeaderName, &'static str); 1]) {
    (StatusCode::FOUND, [(LOCATION, location)])
}

// Checks the credentials and mints a token for the user
async fn issue_for(state: &AppState, form: &CredentialsForm) -> Result<String> {
    form.validate()?;
    let user = state
        .users
        .authenticate(&form.username, &form.password)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    let token = state.tokens.issue(&user.username)?;
    tracing::info!(user_id = user.id, "user logged in");
    Ok(token)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(body): Form<CredentialsForm>,
) -> Result<Response> {
    let token = issue_for(&state, &body).await?;
    let cookie = session_cookie(&token, state.tokens.ttl());
    Ok(([(SET_COOKIE, cookie)], found("/todos/")).into_response())
}

// OAuth2 password flow: sets the cookie and also returns the token in the body
pub async fn login_for_access_token(
    State(state): State<Arc<AppState>>,
    Form(body): Form<CredentialsForm>,
) -> Result<Response> {
    let token = issue_for(&state, &body).await?;
    let cookie = session_cookie(&token, state.tokens.ttl());
    let body = TokenResponse {
        access_token: token,
        token_type: "bearer",
    };
    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(body): Form<CredentialsForm>,
) -> Result<impl IntoResponse> {
    body.validate()?;
    state.users.create(&body.username, &body.password).await?;
    Ok(found("/login"))
}

pub async fn logout() -> impl IntoResponse {
    ([(SET_COOKIE, clear_session_cookie())], found("/"))
}

pub async fn read_users_me(Extension(user): Extension<User>) -> Json<serde_json::Value> {
    Json(json!({ "id": user.id, "username": user.username }))
}

async fn render_todos(state: &AppState, user: &User, page: &Pagination) -> Result<Html<String>> {
    let todos = state.todos.list(user.id, page.skip, page.limit).await?;
    Ok(Html(view::todos(user, &todos)))
}

pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Query(page): Query<Pagination>,
) -> Result<Html<String>> {
    render_todos(&state, &user, &page).await
}

pub async fn get_todo(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse> {
    let todo = state
        .todos
        .get(id, user.id)
        .await?
        .ok_or(Error::NotFound(id))?;
    Ok(Json(json!({ "status": "success", "data": { "todo": todo } })))
}

pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Form(body): Form<CreateTodoForm>,
) -> Result<Html<String>> {
    body.validate()?;
    state
        .todos
        .create(user.id, &body.title, &body.description)
        .await?;
    render_todos(&state, &user, &Pagination::default()).await
}

pub async fn update_todo(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Form(body): Form<UpdateTodoForm>,
) -> Result<Html<String>> {
    body.validate()?;
    state
        .todos
        .update(id, user.id, &body.title, &body.description, body.is_completed())
        .await?
        .ok_or(Error::NotFound(id))?;
    render_todos(&state, &user, &Pagination::default()).await
}

pub async fn delete_todo(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Html<String>> {
    state
        .todos
        .delete(id, user.id)
        .await?
        .ok_or(Error::NotFound(id))?;
    render_todos(&state, &user, &Pagination::default()).await
}
