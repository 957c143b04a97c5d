//! Task list management: models, filtering and a lock-guarded store.

mod models;
mod store;

pub use models::{NewTask, SortKey, Task, TaskPriority, TaskQuery, TaskStatus, TaskUpdate};
pub use store::TaskStore;
