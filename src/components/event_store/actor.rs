use super::EventStore;
use crate::components::scheduler::{CalendarEvent, Scheduler};
use crate::error::{Error, TempoResult};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

/// Commands that can be sent to the event store actor
pub enum EventStoreCommand {
    ListEvents(oneshot::Sender<TempoResult<Vec<CalendarEvent>>>),
    GetEvent(String, oneshot::Sender<TempoResult<CalendarEvent>>),
    CreateEvent(CalendarEvent, oneshot::Sender<TempoResult<CalendarEvent>>),
    UpdateEvent(String, CalendarEvent, oneshot::Sender<TempoResult<CalendarEvent>>),
    DeleteEvent(String, oneshot::Sender<TempoResult<()>>),
    Shutdown,
}

/// The actor that owns the event store.
///
/// Commands are handled one at a time, so every load-modify-save sequence
/// sees the result of the previous one.
pub struct EventStoreActor {
    store: Box<dyn EventStore>,
    scheduler: Scheduler,
    command_rx: mpsc::Receiver<EventStoreCommand>,
}

impl EventStoreActor {
    pub fn new(
        store: Box<dyn EventStore>,
        scheduler: Scheduler,
        command_rx: mpsc::Receiver<EventStoreCommand>,
    ) -> Self {
        Self {
            store,
            scheduler,
            command_rx,
        }
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Event store actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                EventStoreCommand::ListEvents(response_tx) => {
                    let _ = response_tx.send(self.store.list_events().await);
                }
                EventStoreCommand::GetEvent(id, response_tx) => {
                    let _ = response_tx.send(self.get_event(&id).await);
                }
                EventStoreCommand::CreateEvent(event, response_tx) => {
                    let _ = response_tx.send(self.create_event(event).await);
                }
                EventStoreCommand::UpdateEvent(id, event, response_tx) => {
                    let _ = response_tx.send(self.update_event(&id, event).await);
                }
                EventStoreCommand::DeleteEvent(id, response_tx) => {
                    let _ = response_tx.send(self.delete_event(&id).await);
                }
                EventStoreCommand::Shutdown => {
                    info!("Event store actor shutting down");
                    break;
                }
            }
        }

        info!("Event store actor shut down");
    }

    async fn get_event(&self, id: &str) -> TempoResult<CalendarEvent> {
        self.store
            .list_events()
            .await?
            .into_iter()
            .find(|event| event.id == id)
            .ok_or_else(|| not_found(id))
    }

    async fn create_event(&self, mut event: CalendarEvent) -> TempoResult<CalendarEvent> {
        if event.id.trim().is_empty() {
            event.id = uuid::Uuid::new_v4().to_string();
        }
        event.interval()?;

        let mut events = self.store.list_events().await?;
        if events.iter().any(|existing| existing.id == event.id) {
            return Err(Error::Conflict(format!(
                "Event with id {} already exists",
                event.id
            )));
        }
        self.check_conflicts(&event, &events)?;

        events.push(event.clone());
        self.save(&events).await?;

        info!("Created event {} ({} - {})", event.id, event.start_time, event.end_time);
        Ok(event)
    }

    async fn update_event(&self, id: &str, mut event: CalendarEvent) -> TempoResult<CalendarEvent> {
        event.id = id.to_string();
        event.interval()?;

        let mut events = self.store.list_events().await?;
        let index = events
            .iter()
            .position(|existing| existing.id == id)
            .ok_or_else(|| not_found(id))?;

        let others: Vec<CalendarEvent> = events
            .iter()
            .filter(|existing| existing.id != id)
            .cloned()
            .collect();
        self.check_conflicts(&event, &others)?;

        events[index] = event.clone();
        self.save(&events).await?;

        info!("Updated event {}", id);
        Ok(event)
    }

    async fn delete_event(&self, id: &str) -> TempoResult<()> {
        let mut events = self.store.list_events().await?;
        let initial_count = events.len();
        events.retain(|event| event.id != id);

        if events.len() == initial_count {
            return Err(not_found(id));
        }

        self.save(&events).await?;
        info!("Deleted event {}", id);
        Ok(())
    }

    /// Cancelled events occupy no time, so they never conflict
    fn check_conflicts(&self, event: &CalendarEvent, others: &[CalendarEvent]) -> TempoResult<()> {
        if event.is_cancelled() {
            return Ok(());
        }

        match self.scheduler.find_conflict(event, others)? {
            Some(existing) => Err(Error::Conflict(format!(
                "Event conflicts with existing event {} ({})",
                existing.id, existing.title
            ))),
            None => Ok(()),
        }
    }

    async fn save(&self, events: &[CalendarEvent]) -> TempoResult<()> {
        self.store.save_events(events).await.inspect_err(|e| {
            error!("Failed to save calendar events: {}", e);
        })
    }
}

fn not_found(id: &str) -> Error {
    Error::NotFound(format!("Event {}", id))
}
