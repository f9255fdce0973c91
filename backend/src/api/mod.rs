//! HTTP API module.
//!
//! This module provides the relay server and the API types shared with
//! the frontend.

pub mod server;
pub mod types;

pub use server::{app, start_server, AppState};
pub use types::*;
