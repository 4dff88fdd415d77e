//! Client synchronization layer for the retos (challenges) REST backend.
//!
//! Keeps a local cache of challenges mirrored from the server, applies user
//! actions (create, filter, change state, delete) against it and the API, and
//! renders the visible subset for a terminal.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod notify;
pub mod protocol;
pub mod render;
pub mod store;
pub mod telemetry;
pub mod util;
