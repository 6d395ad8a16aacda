//! MCP tool handlers for the bullet journal server
//!
//! Each tool's body lives here, one file per area. Handlers parse arguments,
//! check references under the state lock, apply a reducer command, release
//! the lock and then persist.

pub mod add;
pub mod delete;
pub mod export;
pub mod list;
pub mod migrate;
pub mod recurring;
pub mod update;
pub mod view;
