use super::models::{NewTask, Task, TaskQuery, TaskUpdate};
use crate::error::{store_error, validation_error, Error, TempoResult};
use crate::utils::json_file::{read_json_list, write_json_list};
use chrono::Local;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Task list guarded by a single lock, optionally mirrored to a JSON file.
///
/// The file is rewritten while the lock is held so two writers can never
/// interleave their saves, and the in-memory list only changes once the
/// save has succeeded.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Mutex<Vec<Task>>,
    path: Option<PathBuf>,
}

impl TaskStore {
    /// Load tasks from `path`; a missing file starts an empty list
    pub async fn load(path: impl Into<PathBuf>) -> TempoResult<Self> {
        let path = path.into();
        let tasks: Vec<Task> = read_json_list(&path).await?;
        info!("Loaded {} tasks from {}", tasks.len(), path.display());

        Ok(Self {
            tasks: Mutex::new(tasks),
            path: Some(path),
        })
    }

    /// A store that never touches the filesystem
    pub fn in_memory(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            path: None,
        }
    }

    pub async fn list(&self, query: &TaskQuery) -> Vec<Task> {
        let tasks = self.tasks.lock().await;
        query.apply(&tasks)
    }

    pub async fn get(&self, id: u64) -> TempoResult<Task> {
        let tasks = self.tasks.lock().await;
        tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    pub async fn create(&self, new_task: NewTask) -> TempoResult<Task> {
        let title = required_title(new_task.title.as_deref())?;

        let mut tasks = self.tasks.lock().await;
        let id = tasks
            .iter()
            .map(|task| task.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| store_error("Task ids are exhausted"))?;
        let task = Task {
            id,
            title,
            status: new_task.status.unwrap_or_default(),
            priority: new_task.priority.unwrap_or_default(),
            due_date: new_task.due_date,
            created_at: Local::now().date_naive(),
        };

        let mut updated = tasks.clone();
        updated.push(task.clone());
        self.persist(&updated).await?;
        *tasks = updated;

        info!("Created task {}: {}", task.id, task.title);
        Ok(task)
    }

    pub async fn update(&self, id: u64, update: TaskUpdate) -> TempoResult<Task> {
        let title = match update.title.as_deref() {
            Some(title) => Some(required_title(Some(title))?),
            None => None,
        };

        let mut tasks = self.tasks.lock().await;
        let index = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(not_found)?;

        let mut task = tasks[index].clone();
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if update.due_date.is_some() {
            task.due_date = update.due_date;
        }

        let mut updated = tasks.clone();
        updated[index] = task.clone();
        self.persist(&updated).await?;
        *tasks = updated;

        info!("Updated task {}", id);
        Ok(task)
    }

    pub async fn delete(&self, id: u64) -> TempoResult<()> {
        let mut tasks = self.tasks.lock().await;
        let updated: Vec<Task> = tasks.iter().filter(|task| task.id != id).cloned().collect();

        if updated.len() == tasks.len() {
            return Err(not_found());
        }

        self.persist(&updated).await?;
        *tasks = updated;

        info!("Deleted task {}", id);
        Ok(())
    }

    async fn persist(&self, tasks: &[Task]) -> TempoResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        write_json_list(path, tasks).await.inspect_err(|e| {
            error!("Failed to save tasks to {}: {}", path.display(), e);
        })
    }
}

fn required_title(title: Option<&str>) -> TempoResult<String> {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(validation_error("Title is required")),
    }
}

fn not_found() -> Error {
    Error::NotFound("Task".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::tasks::{TaskPriority, TaskStatus};
    use chrono::NaiveDate;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_defaults() {
        let store = TaskStore::in_memory(Vec::new());

        let first = store.create(new_task("Write report")).await.unwrap();
        let second = store.create(new_task("Review report")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, TaskStatus::Pending);
        assert_eq!(first.priority, TaskPriority::Medium);
        assert_eq!(first.created_at, Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let store = TaskStore::in_memory(Vec::new());

        let missing = store.create(NewTask::default()).await;
        assert!(matches!(missing, Err(Error::Validation(_))));

        let blank = store.create(new_task("   ")).await;
        assert!(matches!(blank, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_ids_follow_highest_existing() {
        let store = TaskStore::in_memory(Vec::new());
        for title in ["a", "b", "c"] {
            store.create(new_task(title)).await.unwrap();
        }
        store.delete(2).await.unwrap();

        let next = store.create(new_task("d")).await.unwrap();
        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = TaskStore::in_memory(Vec::new());
        store.create(new_task("Draft")).await.unwrap();

        let updated = store
            .update(
                1,
                TaskUpdate {
                    status: Some(TaskStatus::Completed),
                    due_date: NaiveDate::from_ymd_opt(2025, 4, 15),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.due_date, NaiveDate::from_ymd_opt(2025, 4, 15));

        let blank = TaskUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(store.update(1, blank).await, Err(Error::Validation(_))));
        assert!(matches!(
            store.update(9, TaskUpdate::default()).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_task() {
        let store = TaskStore::in_memory(Vec::new());
        let err = store.delete(1).await.unwrap_err();
        assert_eq!(err.to_string(), "Task not found");
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let store = TaskStore::load(&path).await.unwrap();
        store.create(new_task("Persist me")).await.unwrap();

        let reloaded = TaskStore::load(&path).await.unwrap();
        let tasks = reloaded.list(&TaskQuery::default()).await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Persist me");
    }

    #[tokio::test]
    async fn test_failed_save_leaves_tasks_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let store = TaskStore::load(&path).await.unwrap();
        store.create(new_task("Kept")).await.unwrap();

        // A directory in place of the file makes every write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.create(new_task("Lost")).await.is_err());
        let update = TaskUpdate {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(store.update(1, update).await.is_err());
        assert!(store.delete(1).await.is_err());

        let tasks = store.list(&TaskQuery::default()).await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Kept");
    }

    #[tokio::test]
    async fn test_exhausted_ids_are_rejected() {
        let store = TaskStore::in_memory(vec![Task {
            id: u64::MAX,
            title: "Last".to_string(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: Local::now().date_naive(),
        }]);

        assert!(matches!(
            store.create(new_task("One too many")).await,
            Err(Error::Store(_))
        ));
        assert_eq!(store.list(&TaskQuery::default()).await.len(), 1);
    }
}
