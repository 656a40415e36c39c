//! Shared foundations for the Engram tool server.
//!
//! Holds the error taxonomy, environment-driven configuration, and the
//! tracing initialization used by the server binary. Domain logic lives in
//! the sibling crates (`engram-content`, `engram-store`, `engram-providers`,
//! `engram-tools`).

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{Error, Result};
