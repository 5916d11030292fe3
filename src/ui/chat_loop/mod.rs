//! Interactive chat session: terminal lifecycle, the event loop, and the
//! background tasks it spawns.

mod event_loop;
pub mod executors;
mod lifecycle;
pub mod setup;

pub use event_loop::run_chat;
pub use executors::Collaborators;
pub use setup::{bootstrap_app, ChatOptions};
