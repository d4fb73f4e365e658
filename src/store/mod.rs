//! Persistent records, one store per table.

pub mod todo;
pub mod user;

pub use todo::TodoStore;
pub use user::UserStore;
