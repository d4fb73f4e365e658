//! Multi-user todo list served as HTML pages, with bcrypt passwords and
//! JWT sessions carried in an `access_token` cookie.

use std::sync::Arc;

pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod password;
pub mod route;
pub mod schema;
pub mod session;
pub mod store;
pub mod token;
pub mod view;

use config::Config;
use db::Db;
use password::CredentialStore;
use session::SessionResolver;
use store::{TodoStore, UserStore};
use token::{Clock, SystemClock, TokenService};

// Struct representing the application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub tokens: TokenService,
    pub users: UserStore,
    pub todos: TodoStore,
    pub sessions: SessionResolver,
}

impl AppState {
    pub fn new(config: Config, db: Db) -> Self {
        Self::with_clock(config, db, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, db: Db, clock: Arc<dyn Clock>) -> Self {
        let tokens = TokenService::new(
            config.secret_key.as_bytes(),
            config.access_token_ttl,
            clock,
        );
        let users = UserStore::new(db.clone(), CredentialStore::new(config.bcrypt_cost));
        let todos = TodoStore::new(db);
        let sessions = SessionResolver::new(tokens.clone(), users.clone());

        Self {
            config,
            tokens,
            users,
            todos,
            sessions,
        }
    }
}
