//! taskhive
//!
//! Local-first task list with one-time remote seeding: the first launch
//! imports a seed list from a remote JSON endpoint into a local SQLite
//! store; every later launch reads the store. Create, edit, complete,
//! delete and text-search flow through one async service.
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - remote: One-shot seed fetch from the remote JSON endpoint
//! - service: Sync/repository component, the single data entry point
//! - view_state: Ordered snapshot and search sequencing for rendering

use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod remote;
pub mod repository;
pub mod service;
pub mod view_state;

pub use domain::{DomainError, DomainResult, Task};
pub use remote::{HttpSeedSource, SeedSource, DEFAULT_SEED_URL};
pub use service::TaskService;
pub use view_state::{TaskListViewState, TaskRow};

/// Open (or create) the store at `db_path` and wire a service around it.
pub async fn open(db_path: &Path, seed: Arc<dyn SeedSource>) -> DomainResult<TaskService> {
    let conn = repository::init_db(db_path).await?;
    let conn = Arc::new(tokio::sync::Mutex::new(conn));
    Ok(TaskService::new(
        repository::TaskRepository::new(conn.clone()),
        repository::SettingsRepository::new(conn),
        seed,
    ))
}
