use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route("/todos", get(list_todos))
        .route("/todos/", get(list_todos))
        .route("/todos/create", post(create_todo))
        .route("/todos/:id", get(get_todo))
        .route("/todos/:id/update", post(update_todo))
        .route("/todos/:id/delete", post(delete_todo))
        .route("/users/me", get(read_users_me))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/", get(home))
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/token", post(login_for_access_token))
        .route("/logout", post(logout))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);
    app
}
