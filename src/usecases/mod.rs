//! Application use cases. Orchestrate domain logic via ports.

pub mod dispatcher;
pub mod event_handler;

pub use dispatcher::{DispatchPolicy, NotificationDispatcher};
pub use event_handler::EventHandler;
