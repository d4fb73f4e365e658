use serde::Serialize;

// Registered account. The password digest never leaves the server.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip)]
    pub hashed_password: String,
}

// Data model representing a Todo item
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub owner_id: i64,
}
