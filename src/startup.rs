use crate::shutdown;
use std::sync::Arc;
use tempo::components::event_store::JsonFileEventStore;
use tempo::components::scheduler::Scheduler;
use tempo::components::{EventStoreHandle, TaskStore};
use tempo::config::Config;
use tempo::error::other_error;
use tempo::web::{router, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Open the stores, bind the listener and serve until a shutdown signal
pub async fn start_server(config: Config) -> miette::Result<()> {
    let scheduler = Scheduler::from_config(&config)?;

    let events_path = config.events_path();
    info!("Using calendar events file {}", events_path.display());
    let events = EventStoreHandle::new(JsonFileEventStore::new(events_path), scheduler);

    let tasks = Arc::new(TaskStore::load(config.tasks_path()).await?);

    let state = AppState::new(events.clone(), tasks, scheduler, &config);
    let app = router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(addr.as_str()).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        tempo::error::Error::from(e)
    })?;
    info!("Listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await;

    shutdown::shutdown_components(events).await;

    served.map_err(|e| tempo::error::Error::from(e).into())
}
