//! Cameo is a terminal client for holding conversations with persistent
//! character agents served by a remote backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session controller: the [`core::app::App`] state, the
//!   action reducer, conversation history, configuration, and session
//!   persistence.
//! - [`character`] loads character documents from disk and resolves the
//!   fuzzy queries users type into a single catalog entry.
//! - [`commands`] parses slash commands and formats their read-only output.
//! - [`api`] defines the backend wire types and the HTTP client.
//! - [`ui`] renders the terminal interface and runs the event loop that
//!   feeds input and task completions into the controller.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which loads configuration, sets up logging,
//! and dispatches into [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod character;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
