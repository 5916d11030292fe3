pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod message;
pub mod session;
pub mod session_store;
