//! Common test utilities for integration tests

#![allow(dead_code)]

use bujo_mcp::{BujoServerHandler, FixedClock, ServerConfig};
use chrono::NaiveDate;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a test handler with temporary storage and the real clock
pub fn get_test_handler() -> (BujoServerHandler, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let handler = BujoServerHandler::new(temp_dir.path().join("journal.toml"), false).unwrap();
    (handler, temp_dir)
}

/// Create a test handler whose "today" is `today`
pub fn get_test_handler_at(today: &str) -> (BujoServerHandler, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = ServerConfig::new(temp_dir.path().join("journal.toml"));
    let handler = BujoServerHandler::with_clock(&config, Arc::new(FixedClock::at_date(d(today))))
        .unwrap();
    (handler, temp_dir)
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Add a dated task with no project or parent
pub async fn add_task(handler: &BujoServerHandler, id: &str, date: Option<&str>) {
    handler
        .handle_add_bullet(
            id.to_string(),
            format!("Task {}", id),
            None,
            date.map(str::to_string),
            None,
            None,
            None,
        )
        .await
        .unwrap();
}

/// Add a bullet with every relationship spelled out
pub async fn add_bullet(
    handler: &BujoServerHandler,
    id: &str,
    bullet_type: &str,
    date: Option<&str>,
    collection_id: Option<&str>,
    parent_note_id: Option<&str>,
) {
    handler
        .handle_add_bullet(
            id.to_string(),
            format!("Bullet {}", id),
            Some(bullet_type.to_string()),
            date.map(str::to_string),
            collection_id.map(str::to_string),
            parent_note_id.map(str::to_string),
            None,
        )
        .await
        .unwrap();
}

pub async fn add_project(handler: &BujoServerHandler, id: &str) {
    handler
        .handle_add_collection(id.to_string(), format!("Project {}", id), None)
        .await
        .unwrap();
}

/// Extract the new ID from a migrate() response
/// Response format: "Bullet <id> migrated to <date> as new bullet ID: <new>"
pub fn extract_new_id(response: &str) -> String {
    response
        .rsplit("ID: ")
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}
