//! Validation helper functions for the bullet journal MCP server
//!
//! This module turns tool arguments (plain strings) into domain values and
//! reports bad input as MCP `INVALID_PARAMS` errors with a message the
//! client can act on.

use crate::dates;
use crate::error::Error;
use crate::export::DateRange;
use crate::journal::{BulletState, BulletType, CollectionType, JournalState, ViewMode};
use crate::note_content;
use crate::recurrence::Frequency;
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;

/// Build an `INVALID_PARAMS` error shown to the client
pub fn invalid_params(message: impl Into<String>) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message.into(), true)
}

/// Report a core error to the client
pub fn to_mcp_error(err: Error) -> mcp_attr::Error {
    invalid_params(err.to_string())
}

/// Parse a date parameter in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    dates::parse_iso_date(date_str).map_err(to_mcp_error)
}

/// Parse an optional date parameter where "" means "clear the date"
///
/// # Returns
/// - `None`: parameter absent, leave the field alone
/// - `Some(None)`: clear the field
/// - `Some(Some(date))`: set the field
pub fn parse_clearable_date(date_str: Option<&str>) -> McpResult<Option<Option<NaiveDate>>> {
    match date_str {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(s) => parse_date(s).map(|d| Some(Some(d))),
    }
}

/// Parse an optional id parameter where "" means "clear the link"
pub fn parse_clearable_id(id: Option<String>) -> Option<Option<String>> {
    id.map(|id| {
        let id = normalize_id(&id);
        if id.is_empty() { None } else { Some(id) }
    })
}

/// Parse a bullet state parameter
pub fn parse_state(state_str: &str) -> McpResult<BulletState> {
    state_str.trim().parse::<BulletState>().map_err(invalid_params)
}

/// Parse a bullet type parameter
pub fn parse_bullet_type(type_str: &str) -> McpResult<BulletType> {
    type_str.trim().parse::<BulletType>().map_err(invalid_params)
}

/// Parse a collection type parameter
pub fn parse_collection_type(type_str: &str) -> McpResult<CollectionType> {
    type_str
        .trim()
        .parse::<CollectionType>()
        .map_err(invalid_params)
}

/// Parse a view mode parameter
pub fn parse_view_mode(mode_str: &str) -> McpResult<ViewMode> {
    mode_str.trim().parse::<ViewMode>().map_err(invalid_params)
}

/// Parse a recurrence frequency parameter
pub fn parse_frequency(frequency_str: &str) -> McpResult<Frequency> {
    frequency_str
        .trim()
        .parse::<Frequency>()
        .map_err(invalid_params)
}

/// Parse an export date range parameter
pub fn parse_date_range(range_str: &str) -> McpResult<DateRange> {
    range_str.trim().parse::<DateRange>().map_err(to_mcp_error)
}

/// Format an error message for an unknown collection, listing the known ones
pub fn format_invalid_collection_error(collection_id: &str, state: &JournalState) -> String {
    if state.collections.is_empty() {
        format!(
            "{}. No collections have been created yet. Create one first using add_collection().",
            Error::collection_not_found(collection_id)
        )
    } else {
        let known: Vec<&str> = state.collections.keys().map(String::as_str).collect();
        format!(
            "{}.\nAvailable collections: {}",
            Error::collection_not_found(collection_id),
            known.join(", ")
        )
    }
}

/// Reject a note body that links to anything but http(s), mailto or tel
pub fn validate_note_body(raw: &str) -> McpResult<()> {
    let bad = note_content::unsafe_links(raw);
    if bad.is_empty() {
        Ok(())
    } else {
        Err(invalid_params(format!(
            "Note contains unsupported link(s): {}. Only http, https, mailto and tel links are allowed.",
            bad.join(", ")
        )))
    }
}

/// Normalize an id by trimming surrounding whitespace
pub fn normalize_id(id: &str) -> String {
    id.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::reducer::{self, Command, NewCollection};

    #[test]
    fn test_parse_clearable_date() {
        assert_eq!(parse_clearable_date(None).unwrap(), None);
        assert_eq!(parse_clearable_date(Some("")).unwrap(), Some(None));
        assert_eq!(
            parse_clearable_date(Some("2025-03-15")).unwrap(),
            Some(NaiveDate::from_ymd_opt(2025, 3, 15))
        );
        assert!(parse_clearable_date(Some("15.03.2025")).is_err());
    }

    #[test]
    fn test_parse_clearable_id() {
        assert_eq!(parse_clearable_id(None), None);
        assert_eq!(parse_clearable_id(Some("  ".to_string())), Some(None));
        assert_eq!(
            parse_clearable_id(Some(" work ".to_string())),
            Some(Some("work".to_string()))
        );
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(parse_state(" open ").unwrap(), BulletState::open);
        assert!(parse_state("finished").is_err());
        assert_eq!(parse_bullet_type("event").unwrap(), BulletType::event);
        assert_eq!(parse_frequency("yearly").unwrap(), Frequency::yearly);
        assert_eq!(parse_date_range("all").unwrap(), DateRange::All);
        assert!(parse_collection_type("folder").is_err());
    }

    #[test]
    fn test_invalid_collection_message_lists_known() {
        let empty = JournalState::new();
        assert!(format_invalid_collection_error("x", &empty).contains("No collections"));

        let state = reducer::apply(
            JournalState::new(),
            Command::AddCollection(NewCollection {
                id: "work".to_string(),
                title: "Work".to_string(),
                collection_type: CollectionType::project,
            }),
            &SystemClock,
        );
        let message = format_invalid_collection_error("x", &state);
        assert!(message.contains("Available collections: work"));
    }

    #[test]
    fn test_validate_note_body() {
        assert!(validate_note_body("just words").is_ok());
        let bad = r#"{"type":"doc","content":[{"type":"text","marks":[{"type":"link","attrs":{"href":"file:///etc/passwd"}}]}]}"#;
        assert!(validate_note_body(bad).is_err());
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id(" task-1 "), "task-1");
        assert_eq!(normalize_id("meeting-prep"), "meeting-prep");
    }
}
