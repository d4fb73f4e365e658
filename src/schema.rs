use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    store::todo::DEFAULT_PAGE_SIZE,
};

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(())
}

// Form body shared by /login, /register and /token
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

impl CredentialsForm {
    pub fn validate(&self) -> Result<()> {
        required("username", &self.username)?;
        // whitespace is a legal password, only an empty one is missing
        if self.password.is_empty() {
            return Err(Error::Validation("password is required".into()));
        }
        Ok(())
    }
}

// Form body for creating a new Todo
#[derive(Debug, Deserialize)]
pub struct CreateTodoForm {
    pub title: String,
    pub description: String,
}

impl CreateTodoForm {
    pub fn validate(&self) -> Result<()> {
        required("title", &self.title)?;
        required("description", &self.description)
    }
}

// Form body for updating a Todo; an unchecked checkbox is simply absent
#[derive(Debug, Deserialize)]
pub struct UpdateTodoForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: Option<String>,
}

impl UpdateTodoForm {
    pub fn validate(&self) -> Result<()> {
        required("title", &self.title)?;
        required("description", &self.description)
    }

    pub fn is_completed(&self) -> bool {
        matches!(
            self.completed.as_deref().map(str::trim),
            Some(v) if v.eq_ignore_ascii_case("true")
                || v.eq_ignore_ascii_case("on")
                || v.eq_ignore_ascii_case("yes")
                || v == "1"
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}
