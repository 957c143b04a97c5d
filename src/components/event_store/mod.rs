mod actor;
mod handle;

pub use handle::EventStoreHandle;

use crate::components::scheduler::CalendarEvent;
use crate::error::TempoResult;
use crate::utils::json_file::{read_json_list, write_json_list};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Persistence for the calendar event list
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// All events in insertion order, cancelled ones included
    async fn list_events(&self) -> TempoResult<Vec<CalendarEvent>>;

    /// Replace the stored list with `events`
    async fn save_events(&self, events: &[CalendarEvent]) -> TempoResult<()>;
}

/// Events kept in a JSON file that is rewritten on every save
#[derive(Debug, Clone)]
pub struct JsonFileEventStore {
    path: PathBuf,
}

impl JsonFileEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EventStore for JsonFileEventStore {
    async fn list_events(&self) -> TempoResult<Vec<CalendarEvent>> {
        read_json_list(&self.path).await
    }

    async fn save_events(&self, events: &[CalendarEvent]) -> TempoResult<()> {
        write_json_list(&self.path, events).await
    }
}

/// In-memory implementation of the event store (for testing)
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<CalendarEvent>>,
}

impl InMemoryEventStore {
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn list_events(&self) -> TempoResult<Vec<CalendarEvent>> {
        Ok(self.events.read().await.clone())
    }

    async fn save_events(&self, events: &[CalendarEvent]) -> TempoResult<()> {
        *self.events.write().await = events.to_vec();
        Ok(())
    }
}
