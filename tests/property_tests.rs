//! Property-based tests for the journal core.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Recurrence output is strictly increasing, bounded by one year and the limit
//! - Hierarchy resolution terminates on arbitrary (cyclic, dangling) parent maps
//! - Export never drops undated bullets of kept projects, never keeps excluded ones

#![allow(clippy::unwrap_used)]

use bujo_mcp::clock::FixedClock;
use bujo_mcp::dates;
use bujo_mcp::export::{DateRange, ExportOptions, filter_for_export};
use bujo_mcp::hierarchy::{self, MAX_DEPTH};
use bujo_mcp::recurrence::{
    Frequency, MAX_OCCURRENCES, RecurrenceConfig, generate_recurring_dates,
};
use bujo_mcp::{Bullet, JournalState};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..10_000).prop_map(|offset| base_date().checked_add_days(Days::new(offset)).unwrap())
}

fn config_strategy() -> impl Strategy<Value = RecurrenceConfig> {
    (
        prop::sample::select(vec![
            Frequency::daily,
            Frequency::weekly,
            Frequency::monthly,
            Frequency::yearly,
        ]),
        1i64..=12,
        prop::option::of(1u32..=31),
        prop::option::of((prop::sample::select(vec![1, 2, 3, 4, -1]), 0u32..=6)),
        prop::option::of(0u64..500),
    )
        .prop_map(|(frequency, interval, month_day, relative, end_offset)| {
            let mut config = RecurrenceConfig::new(frequency, interval);
            if frequency == Frequency::monthly {
                match relative {
                    Some((week, weekday)) => {
                        config.month_week = Some(week);
                        config.month_week_day = Some(weekday);
                    }
                    None => config.month_day = month_day,
                }
            }
            config.end_date =
                end_offset.map(|days| base_date().checked_add_days(Days::new(days)).unwrap());
            config
        })
}

fn bullet(id: usize, parent: Option<String>, collection: Option<String>) -> Bullet {
    Bullet {
        id: format!("b{}", id),
        parent_note_id: parent,
        collection_id: collection,
        ..Default::default()
    }
}

/// Bullets whose parents point anywhere: each other, themselves, or nowhere
fn parent_map_strategy() -> impl Strategy<Value = BTreeMap<String, Bullet>> {
    (1usize..20).prop_flat_map(|n| {
        prop::collection::vec(
            (
                prop::option::of(0..n + 3),
                prop::option::of(prop::sample::select(vec!["", "work", "home"])),
            ),
            n,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (parent, collection))| {
                    let b = bullet(
                        i,
                        parent.map(|p| format!("b{}", p)),
                        collection.map(str::to_string),
                    );
                    (b.id.clone(), b)
                })
                .collect()
        })
    })
}

proptest! {
    /// Property: dates are strictly increasing, start first, within a year and the cap.
    #[test]
    fn prop_recurrence_is_monotonic_and_bounded(
        start in date_strategy(),
        config in config_strategy(),
        limit in 0usize..400,
    ) {
        let generated = generate_recurring_dates(start, &config, limit).unwrap();
        let hard_limit = dates::add_years(start, 1).unwrap();

        prop_assert!(generated.len() <= limit.min(MAX_OCCURRENCES));
        for pair in generated.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for date in &generated {
            prop_assert!(*date >= start);
            prop_assert!(*date <= hard_limit);
            if let Some(end) = config.end_date {
                prop_assert!(*date <= end);
            }
        }
        if let Some(first) = generated.first() {
            prop_assert_eq!(*first, start);
        }
    }

    /// Property: a non-positive interval is always rejected.
    #[test]
    fn prop_non_positive_interval_rejected(start in date_strategy(), interval in -10i64..=0) {
        let config = RecurrenceConfig::new(Frequency::daily, interval);
        prop_assert!(generate_recurring_dates(start, &config, 10).is_err());
    }

    /// Property: resolution terminates and only ever returns a project
    /// actually named somewhere in the map.
    #[test]
    fn prop_hierarchy_terminates(all in parent_map_strategy()) {
        let visible: HashSet<String> = all.keys().cloned().collect();
        for b in all.values() {
            if let Some(project) = hierarchy::resolve_effective_collection(b, &all) {
                prop_assert!(project == "work" || project == "home");
            }
            prop_assert!(hierarchy::compute_depth(b, &all, &visible) <= MAX_DEPTH);
        }
    }

    /// Property: an own project always wins over the parent chain.
    #[test]
    fn prop_own_collection_wins(all in parent_map_strategy()) {
        for b in all.values() {
            if let Some(own) = b.own_collection() {
                prop_assert_eq!(hierarchy::resolve_effective_collection(b, &all), Some(own));
            }
        }
    }

    /// Property: hidden parents contribute no depth.
    #[test]
    fn prop_depth_zero_when_nothing_visible(all in parent_map_strategy()) {
        let visible = HashSet::new();
        for b in all.values() {
            prop_assert_eq!(hierarchy::compute_depth(b, &all, &visible), 0);
        }
    }

    /// Property: export keeps exactly the bullets it should.
    #[test]
    fn prop_export_filter(
        specs in prop::collection::vec(
            (
                prop::option::of(0u64..60),
                prop::option::of(prop::sample::select(vec!["work", "home"])),
            ),
            0..30,
        ),
        exclude_work in any::<bool>(),
        range in prop::sample::select(vec![
            DateRange::All,
            DateRange::ThisWeek,
            DateRange::Past30Days,
        ]),
    ) {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let mut state = JournalState::new();
        for (i, (offset, collection)) in specs.iter().enumerate() {
            let mut b = bullet(i, None, collection.map(str::to_string));
            b.date = offset.map(|days| today.checked_sub_days(Days::new(days)).unwrap());
            state.bullets.insert(b.id.clone(), b);
        }
        let excluded: BTreeSet<String> = if exclude_work {
            ["work".to_string()].into_iter().collect()
        } else {
            BTreeSet::new()
        };
        let options = ExportOptions {
            date_range: range,
            excluded_collection_ids: excluded.clone(),
        };

        let exported = filter_for_export(&state, &options, &FixedClock::at_date(today));
        let interval = range.interval(today);

        for b in state.bullets.values() {
            let excluded_project = b.own_collection().is_some_and(|c| excluded.contains(c));
            let in_range = match (b.date, interval) {
                (None, _) | (_, None) => true,
                (Some(date), Some((start, end))) => start <= date && date <= end,
            };
            prop_assert_eq!(
                exported.bullets.contains_key(&b.id),
                !excluded_project && in_range
            );
        }
        prop_assert_eq!(exported.preferences, state.preferences);
    }
}
