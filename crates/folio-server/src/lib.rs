//! Development server with hot reload for folio docs.
//!
//! Renders pages on request from an in-memory content source and reloads
//! connected browsers over a WebSocket when the docs directory changes.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};
