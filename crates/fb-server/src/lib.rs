//! `fb-server` — the fire-brigade dispatch server.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`command`]   | `Command` and the request-line grammar                    |
//! | [`processor`] | `CommandProcessor`: shared state, request → response      |
//! | [`server`]    | `ConnectionServer`, `ServerHandle`, `serve_lines`         |
//! | [`config`]    | `ServerConfig` (TOML)                                     |
//! | [`seed`]      | Built-in city grid and station catalog                    |
//! | [`error`]     | `CommandError`, `ServerError`                             |
//!
//! # Protocol
//!
//! One request per line, one response per line, fields separated by `|`:
//!
//! ```text
//! > ROUTE 0 2            < ROUTE|0,1,2
//! > INCIDENT 7 2         < INCIDENT_ADDED|1
//! > GET_INCIDENTS        < INCIDENTS|1
//! > PING                 < PONG|Server alive|14:03:59
//! > FOO                  < ERROR
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod processor;
pub mod seed;
pub mod server;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use config::{ListenConfig, NetworkConfig, ServerConfig};
pub use error::{CommandError, CommandResult, ServerError, ServerResult};
pub use processor::CommandProcessor;
pub use server::{serve_lines, ConnectionOptions, ConnectionServer, ServerHandle, TOO_LONG_RESPONSE};
