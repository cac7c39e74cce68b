//! Task Repository - CRUD and Search
//!
//! SQLite-backed implementation for Task storage. Every mutation commits
//! before returning, and id assignment happens inside the same transaction
//! as the insert so concurrent creates cannot collide.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use libsql::Connection;
use tokio::sync::Mutex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::traits::{Repository, SearchableRepository};
use crate::domain::{DomainError, DomainResult, Task};

/// SQLite implementation of the Task repository
pub struct TaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TaskRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Insert a batch of tasks with caller-supplied ids in one transaction.
    ///
    /// Used by the seed import, where remote ids are trusted as-is.
    pub async fn insert_batch(&self, tasks: &[Task]) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        let tx = conn
            .transaction()
            .await
            .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        for task in tasks {
            tx.execute(
                "INSERT INTO tasks (id, title, entry, completed, date_created) VALUES (?, ?, ?, ?, ?)",
                libsql::params![
                    task.id,
                    task.title.clone(),
                    task.entry.clone(),
                    if task.completed { 1 } else { 0 },
                    task.date_created.map(|d| d.timestamp_millis())
                ],
            )
            .await
            .map_err(|e| DomainError::StoreWrite(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Repository<Task> for TaskRepository {
    async fn create(&self, entity: &Task) -> DomainResult<Task> {
        let conn = self.conn.lock().await;

        // Compute max(id) + 1 and insert in the same transaction; the
        // connection mutex gives single-writer discipline on top.
        let tx = conn
            .transaction()
            .await
            .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        let mut rows = tx
            .query("SELECT COALESCE(MAX(id), 0) + 1 FROM tasks", ())
            .await
            .map_err(|e| DomainError::StoreRead(e.to_string()))?;

        let id = match rows
            .next()
            .await
            .map_err(|e| DomainError::StoreRead(e.to_string()))?
        {
            Some(row) => row
                .get::<i32>(0)
                .map_err(|e| DomainError::StoreRead(e.to_string()))?,
            None => 1,
        };

        tx.execute(
            "INSERT INTO tasks (id, title, entry, completed, date_created) VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                id,
                entity.title.clone(),
                entity.entry.clone(),
                if entity.completed { 1 } else { 0 },
                entity.date_created.map(|d| d.timestamp_millis())
            ],
        )
        .await
        .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        let mut task = entity.clone();
        task.id = id;
        Ok(task)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Task>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                "SELECT id, title, entry, completed, date_created FROM tasks WHERE id = ?",
                libsql::params![id],
            )
            .await
            .map_err(|e| DomainError::StoreRead(e.to_string()))?;

        match rows
            .next()
            .await
            .map_err(|e| DomainError::StoreRead(e.to_string()))?
        {
            Some(row) => Ok(Some(row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<Task>> {
        let conn = self.conn.lock().await;

        let mut rows = conn
            .query(
                "SELECT id, title, entry, completed, date_created FROM tasks ORDER BY date_created ASC, id ASC",
                (),
            )
            .await
            .map_err(|e| DomainError::StoreRead(e.to_string()))?;

        let mut tasks = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::StoreRead(e.to_string()))?
        {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    async fn update(&self, entity: &Task) -> DomainResult<Task> {
        let conn = self.conn.lock().await;

        // date_created is immutable after creation and never part of SET
        let affected = conn
            .execute(
                "UPDATE tasks SET title = ?, entry = ?, completed = ? WHERE id = ?",
                libsql::params![
                    entity.title.clone(),
                    entity.entry.clone(),
                    if entity.completed { 1 } else { 0 },
                    entity.id
                ],
            )
            .await
            .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        if affected == 0 {
            return Err(DomainError::NotFound(entity.id));
        }

        Ok(entity.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let conn = self.conn.lock().await;

        let affected = conn
            .execute("DELETE FROM tasks WHERE id = ?", libsql::params![id])
            .await
            .map_err(|e| DomainError::StoreWrite(e.to_string()))?;

        if affected == 0 {
            return Err(DomainError::NotFound(id));
        }

        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<Task> for TaskRepository {
    async fn search(&self, query: &str) -> DomainResult<Vec<Task>> {
        let query = query.trim();
        let all = self.list().await?;

        if query.is_empty() {
            return Ok(all);
        }

        // Substring match over title OR entry, case- and diacritic-insensitive.
        // Filtering the ordered list keeps order among matches.
        let needle = fold(query);
        Ok(all
            .into_iter()
            .filter(|t| {
                fold(t.title.as_deref().unwrap_or("")).contains(&needle)
                    || fold(t.entry_text()).contains(&needle)
            })
            .collect())
    }
}

/// Lowercase and strip combining marks so "Café" and "cafe" compare equal
fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Convert a database row to a Task
fn row_to_task(row: &libsql::Row) -> DomainResult<Task> {
    Ok(Task {
        id: row
            .get::<i32>(0)
            .map_err(|e| DomainError::StoreRead(e.to_string()))?,
        title: row.get::<Option<String>>(1).ok().flatten(),
        entry: row.get::<Option<String>>(2).ok().flatten(),
        completed: row
            .get::<i32>(3)
            .map_err(|e| DomainError::StoreRead(e.to_string()))?
            != 0,
        date_created: row
            .get::<Option<i64>>(4)
            .ok()
            .flatten()
            .and_then(DateTime::from_timestamp_millis),
    })
}

#[cfg(test)]
mod tests {
    use super::fold;

    #[test]
    fn test_fold_strips_case_and_accents() {
        assert_eq!(fold("Café"), "cafe");
        assert_eq!(fold("CRÈME brûlée"), "creme brulee");
        assert_eq!(fold("plain"), "plain");
    }
}
