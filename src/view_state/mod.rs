//! View-State Component
//!
//! `TaskListViewState` holds the ordered snapshot the UI renders from. It
//! consumes the service's async contract and follows one policy for every
//! mutation: call the service, and only after a confirmed success re-derive
//! the snapshot from a canonical read — never an optimistic patch.
//!
//! Rapid consecutive searches are sequenced with a monotonic token; a
//! completion whose token is no longer the latest is discarded, so results
//! cannot arrive out of order.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::sync::Mutex;

use log::warn;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::domain::{DomainResult, Task};
use crate::service::TaskService;

/// Row view-data derived from a task at render time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub id: i32,
    pub title: String,
    pub entry: String,
    pub completed: bool,
    pub formatted_date: String,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.display_title(),
            entry: task.entry_text().to_string(),
            completed: task.completed,
            formatted_date: task.created_at().format("%d/%m/%y").to_string(),
        }
    }
}

/// Ordered, possibly filtered snapshot of the task list
pub struct TaskListViewState {
    service: Arc<TaskService>,
    snapshot: RwLock<Vec<Task>>,
    /// Latest requested search text; blank means unfiltered
    search_text: Mutex<String>,
    /// Monotonic token; only the latest issued search may publish
    search_seq: AtomicU64,
}

impl TaskListViewState {
    pub fn new(service: Arc<TaskService>) -> Self {
        Self {
            service,
            snapshot: RwLock::new(Vec::new()),
            search_text: Mutex::new(String::new()),
            search_seq: AtomicU64::new(0),
        }
    }

    /// Populate the snapshot: seed on first launch, local store afterwards
    pub async fn load(&self) {
        let tasks = self.service.initial_load().await;
        *self.snapshot.write().await = tasks;
    }

    /// Run a search and publish the result unless a newer search was issued
    /// in the meantime. Returns whether the result was applied.
    ///
    /// The token is claimed before any awaiting happens, so the issue order
    /// matches the order of calls even when completions interleave.
    pub fn set_search_text<'a>(&'a self, text: &str) -> impl Future<Output = bool> + 'a {
        let token = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let query = text.to_string();
        {
            let mut current = self.search_text.lock().expect("search_text poisoned");
            *current = query.clone();
        }

        async move {
            match self.service.search(&query).await {
                Ok(tasks) => {
                    if self.search_seq.load(Ordering::SeqCst) != token {
                        // Superseded while in flight
                        return false;
                    }
                    *self.snapshot.write().await = tasks;
                    true
                }
                Err(e) => {
                    warn!("search failed, snapshot unchanged: {e}");
                    false
                }
            }
        }
    }

    /// Create-or-edit dispatch, as the detail view submits it
    pub async fn save_task(
        &self,
        id: Option<i32>,
        title: &str,
        entry: &str,
    ) -> DomainResult<Task> {
        match id {
            Some(id) => self.edit_task(id, title, entry).await,
            None => self.create_task(title, entry).await,
        }
    }

    pub async fn create_task(&self, title: &str, entry: &str) -> DomainResult<Task> {
        let task = self.service.create(title, entry).await?;
        self.refresh().await;
        Ok(task)
    }

    pub async fn edit_task(&self, id: i32, title: &str, entry: &str) -> DomainResult<Task> {
        let task = self.service.edit(id, title, entry).await?;
        self.refresh().await;
        Ok(task)
    }

    pub async fn toggle_completion(&self, id: i32) -> DomainResult<Task> {
        let task = self.service.toggle_completion(id).await?;
        self.refresh().await;
        Ok(task)
    }

    pub async fn delete_task(&self, id: i32) -> DomainResult<()> {
        self.service.delete(id).await?;
        self.refresh().await;
        Ok(())
    }

    /// Re-derive the snapshot from a canonical read using the current
    /// search text. Only called after a confirmed commit.
    async fn refresh(&self) {
        let query = self
            .search_text
            .lock()
            .expect("search_text poisoned")
            .clone();
        // A false return means a newer search already owns the snapshot
        let _ = self.set_search_text(&query).await;
    }

    /// Rows for rendering, derived from the snapshot
    pub async fn rows(&self) -> Vec<TaskRow> {
        self.snapshot.read().await.iter().map(TaskRow::from_task).collect()
    }

    /// Current snapshot, in listing order
    pub async fn tasks(&self) -> Vec<Task> {
        self.snapshot.read().await.clone()
    }

    /// Number of tasks currently displayed
    pub async fn task_count(&self) -> usize {
        self.snapshot.read().await.len()
    }
}
