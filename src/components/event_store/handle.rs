use super::actor::{EventStoreActor, EventStoreCommand};
use super::EventStore;
use crate::components::scheduler::{CalendarEvent, Scheduler};
use crate::error::{store_error, TempoResult};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Handle for interacting with the event store actor
#[derive(Clone)]
pub struct EventStoreHandle {
    command_tx: mpsc::Sender<EventStoreCommand>,
    _actor_task: Arc<JoinHandle<()>>,
}

impl EventStoreHandle {
    /// Create a new EventStoreHandle and spawn the actor
    pub fn new(store: impl EventStore, scheduler: Scheduler) -> Self {
        let (command_tx, command_rx) = mpsc::channel(32);
        let mut actor = EventStoreActor::new(Box::new(store), scheduler, command_rx);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            command_tx,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Get all events, including cancelled ones
    pub async fn list_events(&self) -> TempoResult<Vec<CalendarEvent>> {
        self.request(EventStoreCommand::ListEvents).await
    }

    /// Get a single event by id
    pub async fn get_event(&self, id: impl Into<String>) -> TempoResult<CalendarEvent> {
        let id = id.into();
        self.request(|tx| EventStoreCommand::GetEvent(id, tx)).await
    }

    /// Validate, conflict-check and store a new event
    pub async fn create_event(&self, event: CalendarEvent) -> TempoResult<CalendarEvent> {
        self.request(|tx| EventStoreCommand::CreateEvent(event, tx)).await
    }

    /// Replace the event stored under `id`
    pub async fn update_event(
        &self,
        id: impl Into<String>,
        event: CalendarEvent,
    ) -> TempoResult<CalendarEvent> {
        let id = id.into();
        self.request(|tx| EventStoreCommand::UpdateEvent(id, event, tx)).await
    }

    /// Remove the event stored under `id`
    pub async fn delete_event(&self, id: impl Into<String>) -> TempoResult<()> {
        let id = id.into();
        self.request(|tx| EventStoreCommand::DeleteEvent(id, tx)).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> TempoResult<()> {
        let _ = self.command_tx.send(EventStoreCommand::Shutdown).await;
        Ok(())
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<TempoResult<T>>) -> EventStoreCommand,
    ) -> TempoResult<T> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(command(response_tx))
            .await
            .map_err(|e| store_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .await
            .map_err(|_| store_error("Response channel closed"))?
    }
}
