// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive tester.
//
// Module responsibilities:
// - `config`: Resolves backend URL, user id and optional auth token from
//   the environment, with built-in defaults.
// - `notification`: The outbound notification record and helpers for
//   rendering inbound payloads of unknown shape.
// - `api`: Encapsulates the two HTTP interactions with the backend
//   (health check, notification send).
// - `realtime`: Owns the persistent websocket connection and the shared
//   state it feeds (connection flag, received-notification log).
// - `ui`: Implements the terminal menu loop and delegates to `api` and
//   `realtime`.
//
// Keeping this separation makes it easier to test the API and transport
// logic against stub servers without driving the terminal UI.
pub mod api;
pub mod config;
pub mod notification;
pub mod realtime;
pub mod ui;
