// Export components
pub mod event_store;
pub mod scheduler;
pub mod tasks;

// Re-export the handles the server wires together
pub use event_store::EventStoreHandle;
pub use tasks::TaskStore;
