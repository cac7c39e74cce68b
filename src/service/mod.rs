//! Sync/Repository Component
//!
//! `TaskService` is the single entry point for all task data access and
//! mutation. It hides whether data comes from the one-time network seed or
//! the local store, and owns the persisted "has launched before" flag.

use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};

use crate::domain::{DomainResult, Task};
use crate::remote::SeedSource;
use crate::repository::{
    Repository, SearchableRepository, SettingsRepository, TaskRepository, HAS_LAUNCHED_BEFORE,
};

/// Single entry point for task data; collaborators are constructor-injected
/// so the seed-vs-load branch is testable without real persisted settings.
pub struct TaskService {
    repo: TaskRepository,
    settings: SettingsRepository,
    seed: Arc<dyn SeedSource>,
}

impl TaskService {
    pub fn new(
        repo: TaskRepository,
        settings: SettingsRepository,
        seed: Arc<dyn SeedSource>,
    ) -> Self {
        Self {
            repo,
            settings,
            seed,
        }
    }

    /// First call of an installation seeds from the remote source; every
    /// later call reads the local store.
    ///
    /// This is the one fail-soft boundary: errors are logged and degrade to
    /// an empty list so the first paint never crashes. The launch flag is
    /// set exactly once even when the seed fails, so a failed seed is never
    /// retried automatically — a known limitation, kept on purpose.
    pub async fn initial_load(&self) -> Vec<Task> {
        let launched = match self.settings.flag(HAS_LAUNCHED_BEFORE).await {
            Ok(v) => v,
            Err(e) => {
                // Reading the store is safer than risking a duplicate seed
                error!("failed to read launch flag, assuming launched: {e}");
                true
            }
        };

        if launched {
            return match self.load_from_store().await {
                Ok(tasks) => tasks,
                Err(e) => {
                    error!("initial load from store failed: {e}");
                    Vec::new()
                }
            };
        }

        let tasks = match self.seed_from_remote().await {
            Ok(tasks) => {
                info!("seeded {} tasks from remote", tasks.len());
                tasks
            }
            Err(e) => {
                warn!("seed from remote failed, starting empty: {e}");
                Vec::new()
            }
        };

        if let Err(e) = self.settings.set_flag(HAS_LAUNCHED_BEFORE, true).await {
            error!("failed to persist launch flag: {e}");
        }

        tasks
    }

    /// Fetch the remote seed once and import it into the local store.
    ///
    /// Each remote item becomes a local task with a synthesized
    /// "Task #<id>" title, the remote id trusted as-is, and the import
    /// instant as creation time (not the remote time). The whole batch is
    /// committed in one transaction and returned without re-reading the
    /// store.
    pub async fn seed_from_remote(&self) -> DomainResult<Vec<Task>> {
        let todos = self.seed.fetch_todos().await?;
        let imported_at = Utc::now();

        let tasks: Vec<Task> = todos
            .into_iter()
            .map(|todo| Task {
                id: todo.id,
                title: Some(format!("Task #{}", todo.id)),
                entry: Some(todo.todo),
                completed: todo.completed,
                date_created: Some(imported_at),
            })
            .collect();

        self.repo.insert_batch(&tasks).await?;
        Ok(tasks)
    }

    /// All tasks, ascending by creation time
    pub async fn load_from_store(&self) -> DomainResult<Vec<Task>> {
        self.repo.list().await
    }

    /// Substring search over title OR entry, case- and diacritic-insensitive.
    /// A blank query is equivalent to `load_from_store`.
    pub async fn search(&self, query: &str) -> DomainResult<Vec<Task>> {
        self.repo.search(query).await
    }

    /// Create a task; the store assigns the id inside the insert transaction
    pub async fn create(&self, title: &str, entry: &str) -> DomainResult<Task> {
        let task = Task::new(0, Some(title.to_string()), Some(entry.to_string()));
        self.repo.create(&task).await
    }

    /// Update exactly title and entry, leaving completion and creation
    /// time untouched
    pub async fn edit(&self, id: i32, title: &str, entry: &str) -> DomainResult<Task> {
        let mut task = match self.repo.find_by_id(id).await? {
            Some(task) => task,
            None => return Err(crate::domain::DomainError::NotFound(id)),
        };
        task.title = Some(title.to_string());
        task.entry = Some(entry.to_string());
        self.repo.update(&task).await
    }

    /// Flip the completion flag
    pub async fn toggle_completion(&self, id: i32) -> DomainResult<Task> {
        let mut task = match self.repo.find_by_id(id).await? {
            Some(task) => task,
            None => return Err(crate::domain::DomainError::NotFound(id)),
        };
        task.completed = !task.completed;
        self.repo.update(&task).await
    }

    /// Remove a task
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.repo.delete(id).await
    }
}
