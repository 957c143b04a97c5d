use crate::utils::time::optional_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Workflow state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Task priority, ordered from low to high
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// A task as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, with = "optional_date")]
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
}

/// Body of a task creation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    /// Required, but optional here so a missing title is reported as such
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default, with = "optional_date")]
    pub due_date: Option<NaiveDate>,
}

/// Body of a task update request; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default, with = "optional_date")]
    pub due_date: Option<NaiveDate>,
}

/// Field a task list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Title,
    Status,
    Priority,
    DueDate,
    CreatedAt,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "status" => Some(Self::Status),
            "priority" => Some(Self::Priority),
            "due_date" => Some(Self::DueDate),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Title => a.title.cmp(&b.title),
            Self::Status => a.status.cmp(&b.status),
            Self::Priority => a.priority.cmp(&b.priority),
            Self::DueDate => a.due_date.cmp(&b.due_date),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

/// Filters and ordering for task listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    /// Sort field, `-` prefix for descending
    pub sort: Option<String>,
}

impl TaskQuery {
    /// Filter and sort `tasks` according to the query
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let search = self.search.as_ref().map(|term| term.to_lowercase());

        let mut matching: Vec<Task> = tasks
            .iter()
            .filter(|task| self.status.map_or(true, |status| task.status == status))
            .filter(|task| self.priority.map_or(true, |priority| task.priority == priority))
            .filter(|task| {
                search
                    .as_deref()
                    .map_or(true, |term| task.title.to_lowercase().contains(term))
            })
            .cloned()
            .collect();

        if let Some(sort) = self.sort.as_deref() {
            let (field, descending) = match sort.strip_prefix('-') {
                Some(field) => (field, true),
                None => (sort, false),
            };

            if let Some(key) = SortKey::parse(field) {
                matching.sort_by(|a, b| {
                    let ordering = key.compare(a, b);
                    if descending {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
            }
        }

        matching
    }
}
