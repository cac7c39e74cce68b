//! Task Entity
//!
//! The sole entity of the crate: a to-do item with a nullable title and
//! body, a completion flag, and an immutable creation timestamp that is
//! the sort key for every listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// A task record as held in the local store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store (seed ids are trusted as-is)
    pub id: i32,
    /// Optional title; display falls back to "Task #<id>" when absent or empty
    pub title: Option<String>,
    /// Free-text body
    pub entry: Option<String>,
    /// Completion status
    pub completed: bool,
    /// Set once at creation, never updated; sole listing sort key
    pub date_created: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new incomplete task stamped with the current instant.
    ///
    /// `id` 0 is a placeholder; the store assigns the real id on insert.
    pub fn new(id: i32, title: Option<String>, entry: Option<String>) -> Self {
        Self {
            id,
            title,
            entry,
            completed: false,
            date_created: Some(Utc::now()),
        }
    }

    /// Title for display; the fallback is computed here, never persisted
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(t) if !t.is_empty() => t.clone(),
            _ => format!("Task #{}", self.id),
        }
    }

    /// Body text, empty string when absent
    pub fn entry_text(&self) -> &str {
        self.entry.as_deref().unwrap_or("")
    }

    /// Creation instant; falls back to "now" for display of legacy
    /// records with no stored timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.date_created.unwrap_or_else(Utc::now)
    }
}

impl Entity for Task {
    type Id = i32;

    fn id(&self) -> Self::Id {
        self.id
    }
}
