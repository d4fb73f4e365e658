use sqlx::query_as;

use crate::{db::Db, error::Result, model::TodoItem};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

const TODO_COLUMNS: &str = "id, title, description, completed, owner_id";

/// The `todo_items` table. Every query is filtered by owner.
#[derive(Debug, Clone)]
pub struct TodoStore {
    db: Db,
}

impl TodoStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Items owned by `owner_id` in insertion order.
    pub async fn list(&self, owner_id: i64, offset: u32, limit: u32) -> Result<Vec<TodoItem>> {
        let todos = query_as::<_, TodoItem>(&format!(
            "SELECT {TODO_COLUMNS} FROM todo_items WHERE owner_id = ? ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(owner_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.db)
        .await?;
        Ok(todos)
    }

    pub async fn get(&self, id: i64, owner_id: i64) -> Result<Option<TodoItem>> {
        let todo = query_as::<_, TodoItem>(&format!(
            "SELECT {TODO_COLUMNS} FROM todo_items WHERE id = ? AND owner_id = ?"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }

    pub async fn create(&self, owner_id: i64, title: &str, description: &str) -> Result<TodoItem> {
        let todo = query_as::<_, TodoItem>(&format!(
            "INSERT INTO todo_items (title, description, completed, owner_id) \
             VALUES (?, ?, 0, ?) RETURNING {TODO_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;
        tracing::debug!(todo_id = todo.id, owner_id, "created todo");
        Ok(todo)
    }

    /// Overwrites the mutable fields. `None` when the item is missing or owned by someone else.
    pub async fn update(
        &self,
        id: i64,
        owner_id: i64,
        title: &str,
        description: &str,
        completed: bool,
    ) -> Result<Option<TodoItem>> {
        let todo = query_as::<_, TodoItem>(&format!(
            "UPDATE todo_items SET title = ?, description = ?, completed = ? \
             WHERE id = ? AND owner_id = ? RETURNING {TODO_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(completed)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }

    /// Removes and returns the item. `None` when the item is missing or owned by someone else.
    pub async fn delete(&self, id: i64, owner_id: i64) -> Result<Option<TodoItem>> {
        let todo = query_as::<_, TodoItem>(&format!(
            "DELETE FROM todo_items WHERE id = ? AND owner_id = ? RETURNING {TODO_COLUMNS}"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::connect_in_memory, password::CredentialStore, store::UserStore};

    async fn setup() -> (TodoStore, i64, i64) {
        let db = connect_in_memory().await.unwrap();
        let users = UserStore::new(db.clone(), CredentialStore::new(4));
        let alice = users.create("alice", "pw1").await.unwrap();
        let bob = users.create("bob", "pw2").await.unwrap();
        (TodoStore::new(db), alice.id, bob.id)
    }

    #[tokio::test]
    async fn create_defaults_to_incomplete() {
        let (todos, alice, _) = setup().await;
        let item = todos.create(alice, "Buy milk", "2%").await.unwrap();
        assert!(!item.completed);
        assert_eq!(item.owner_id, alice);

        let listed = todos.list(alice, 0, DEFAULT_PAGE_SIZE).await.unwrap();
        assert_eq!(listed, vec![item]);
    }

    #[tokio::test]
    async fn update_get_delete_lifecycle() {
        let (todos, alice, _) = setup().await;
        let item = todos.create(alice, "Buy milk", "2%").await.unwrap();

        let updated = todos
            .update(item.id, alice, "Buy milk", "Whole", true)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.description, "Whole");

        let fetched = todos.get(item.id, alice).await.unwrap().unwrap();
        assert_eq!(fetched, updated);

        let deleted = todos.delete(item.id, alice).await.unwrap().unwrap();
        assert_eq!(deleted.id, item.id);
        assert!(todos.get(item.id, alice).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn other_owner_sees_nothing() {
        let (todos, alice, bob) = setup().await;
        let item = todos.create(alice, "private", "alice only").await.unwrap();

        assert!(todos.get(item.id, bob).await.unwrap().is_none());
        assert!(todos
            .update(item.id, bob, "hijacked", "x", true)
            .await
            .unwrap()
            .is_none());
        assert!(todos.delete(item.id, bob).await.unwrap().is_none());
        assert!(todos.list(bob, 0, DEFAULT_PAGE_SIZE).await.unwrap().is_empty());

        // untouched for the owner
        let still = todos.get(item.id, alice).await.unwrap().unwrap();
        assert_eq!(still, item);
    }

    #[tokio::test]
    async fn missing_item_is_absent_not_an_error() {
        let (todos, alice, _) = setup().await;
        assert!(todos.get(999, alice).await.unwrap().is_none());
        assert!(todos.update(999, alice, "t", "d", false).await.unwrap().is_none());
        assert!(todos.delete(999, alice).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn pagination_in_insertion_order() {
        let (todos, alice, bob) = setup().await;
        for n in 0..15 {
            todos.create(alice, &format!("item {n}"), "").await.unwrap();
        }
        todos.create(bob, "bob's", "").await.unwrap();

        let first = todos.list(alice, 0, 10).await.unwrap();
        let second = todos.list(alice, 10, 10).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 5);
        assert_eq!(first[0].title, "item 0");
        assert_eq!(second[4].title, "item 14");
        assert!(first.iter().chain(&second).all(|t| t.owner_id == alice));
    }
}
