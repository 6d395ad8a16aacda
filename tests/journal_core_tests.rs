//! Recurrence, hierarchy and export through the public API

use bujo_mcp::clock::FixedClock;
use bujo_mcp::export::{DateRange, ExportOptions, filter_for_export};
use bujo_mcp::hierarchy::{compute_depth, resolve_effective_collection};
use bujo_mcp::recurrence::{Frequency, RecurrenceConfig, generate_recurring_iso_dates};
use bujo_mcp::{Bullet, Collection, CollectionType, Error, JournalState};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn iso(config: &RecurrenceConfig, start: &str, limit: usize) -> Vec<String> {
    generate_recurring_iso_dates(start, config, limit).unwrap()
}

fn bullet(id: &str, parent: Option<&str>, collection: Option<&str>) -> Bullet {
    Bullet {
        id: id.to_string(),
        content: id.to_string(),
        parent_note_id: parent.map(str::to_string),
        collection_id: collection.map(str::to_string),
        ..Default::default()
    }
}

fn map(bullets: Vec<Bullet>) -> BTreeMap<String, Bullet> {
    bullets.into_iter().map(|b| (b.id.clone(), b)).collect()
}

#[test]
fn test_daily_and_weekly_series() {
    let daily = RecurrenceConfig::new(Frequency::daily, 1);
    assert_eq!(
        iso(&daily, "2025-01-01", 3),
        vec!["2025-01-01", "2025-01-02", "2025-01-03"]
    );

    let weekly = RecurrenceConfig::new(Frequency::weekly, 1);
    assert_eq!(
        iso(&weekly, "2025-01-01", 3),
        vec!["2025-01-01", "2025-01-08", "2025-01-15"]
    );
}

#[test]
fn test_monthly_day_31_clamps_without_rollover() {
    let config = RecurrenceConfig {
        month_day: Some(31),
        ..RecurrenceConfig::new(Frequency::monthly, 1)
    };
    assert_eq!(
        iso(&config, "2025-03-31", 4),
        vec!["2025-03-31", "2025-04-30", "2025-05-31", "2025-06-30"]
    );
}

#[test]
fn test_yearly_gives_two_dates() {
    let config = RecurrenceConfig::new(Frequency::yearly, 1);
    assert_eq!(
        iso(&config, "2025-06-15", 52),
        vec!["2025-06-15", "2026-06-15"]
    );
}

#[test]
fn test_invalid_start_date() {
    let config = RecurrenceConfig::new(Frequency::daily, 1);
    let err = generate_recurring_iso_dates("2025-13-01", &config, 3).unwrap_err();
    assert!(matches!(err, Error::InvalidDateFormat { .. }));
}

#[test]
fn test_two_node_cycle() {
    let all = map(vec![bullet("a", Some("b"), None), bullet("b", Some("a"), None)]);
    let visible: HashSet<String> = all.keys().cloned().collect();
    assert_eq!(compute_depth(&all["a"], &all, &visible), 2);
    assert_eq!(resolve_effective_collection(&all["a"], &all), None);
}

#[test]
fn test_inheritance_and_override() {
    let all = map(vec![
        bullet("note", None, Some("work")),
        bullet("inherits", Some("note"), None),
        bullet("own", Some("note"), Some("home")),
        bullet("orphan", Some("deleted"), None),
    ]);
    assert_eq!(resolve_effective_collection(&all["inherits"], &all), Some("work"));
    assert_eq!(resolve_effective_collection(&all["own"], &all), Some("home"));
    assert_eq!(resolve_effective_collection(&all["orphan"], &all), None);

    let visible: HashSet<String> = ["inherits".to_string()].into_iter().collect();
    // Parent exists but is filtered out of the listing
    assert_eq!(compute_depth(&all["inherits"], &all, &visible), 0);
}

#[test]
fn test_export_excludes_project_and_keeps_undated() {
    let mut state = JournalState::new();
    for (id, date, collection) in [
        ("work-dated", Some("2025-01-15"), Some("work")),
        ("work-undated", None, Some("work")),
        ("loose-undated", None, None),
        ("old", Some("2024-06-01"), None),
    ] {
        let mut b = bullet(id, None, collection);
        b.date = date.map(d);
        state.bullets.insert(id.to_string(), b);
    }
    state.collections.insert(
        "work".to_string(),
        Collection {
            id: "work".to_string(),
            title: "Work".to_string(),
            collection_type: CollectionType::project,
            created_at: 0,
            order: None,
            archived: false,
        },
    );

    let options = ExportOptions {
        date_range: DateRange::Past30Days,
        excluded_collection_ids: ["work".to_string()].into_iter().collect(),
    };
    let clock = FixedClock::at_date(d("2025-01-17"));
    let exported = filter_for_export(&state, &options, &clock);

    let ids: Vec<&str> = exported.bullets.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["loose-undated"]);
    assert!(exported.collections.is_empty());
    assert_eq!(exported.view, state.view);
}
