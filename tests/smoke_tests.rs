use std::sync::Arc;
use tempo::components::event_store::{InMemoryEventStore, JsonFileEventStore};
use tempo::components::scheduler::{CalendarEvent, Scheduler};
use tempo::components::tasks::{NewTask, TaskQuery};
use tempo::components::{EventStoreHandle, TaskStore};
use tempo::config::Config;
use tempo::utils::time::parse_timestamp;

fn meeting(start: &str, end: &str) -> CalendarEvent {
    CalendarEvent::new(
        "Smoke test",
        parse_timestamp(start).unwrap(),
        parse_timestamp(end).unwrap(),
    )
    .unwrap()
}

/// Smoke test to verify that the default config is usable
#[tokio::test]
async fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.bind_address(), "127.0.0.1:8000");
    assert!(config.events_path().ends_with("calendar_events.json"));
    assert!(config.tasks_path().ends_with("tasks.json"));
    assert!(Scheduler::from_config(&config).is_ok());
}

/// Smoke test for the event store handle
#[tokio::test]
async fn test_event_store_handle_creation() {
    let handle = EventStoreHandle::new(InMemoryEventStore::default(), Scheduler::default());

    assert!(handle.list_events().await.unwrap().is_empty());
    assert!(handle.shutdown().await.is_ok());
}

/// Events written through one handle are visible to a fresh one on the same file
#[tokio::test]
async fn test_events_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("calendar_events.json");

    let first = EventStoreHandle::new(JsonFileEventStore::new(&path), Scheduler::default());
    let created = first
        .create_event(meeting("2025-04-15T10:00", "2025-04-15T11:00"))
        .await
        .unwrap();
    first.shutdown().await.unwrap();

    let second = EventStoreHandle::new(JsonFileEventStore::new(&path), Scheduler::default());
    let events = second.list_events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, created.id);

    // The reloaded event still blocks its slot
    let clash = second
        .create_event(meeting("2025-04-15T10:30", "2025-04-15T11:30"))
        .await;
    assert!(clash.is_err());
}

/// Concurrent task creation through a shared store never reuses an id
#[tokio::test]
async fn test_concurrent_task_creation() {
    let store = Arc::new(TaskStore::in_memory(Vec::new()));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .create(NewTask {
                        title: Some(format!("Task {i}")),
                        ..Default::default()
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut ids: Vec<u64> = store
        .list(&TaskQuery::default())
        .await
        .into_iter()
        .map(|task| task.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
}
