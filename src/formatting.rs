//! Formatting helper functions for the bullet journal MCP server
//!
//! Renders listings as plain text for the MCP client, using rapid-logging
//! signifiers, indentation through parent notes and (optionally) grouping
//! by effective project.

use crate::hierarchy;
use crate::journal::{Bullet, BulletState, BulletType, JournalState};
use std::collections::HashSet;

/// Rapid-logging signifier for a bullet
pub fn signifier(bullet: &Bullet) -> &'static str {
    match (bullet.bullet_type, bullet.state) {
        (_, BulletState::migrated) => ">",
        (_, BulletState::scheduled) => "<",
        (_, BulletState::cancelled) => "~",
        (BulletType::task, BulletState::completed) => "x",
        (BulletType::task, _) => "•",
        (BulletType::note, _) => "-",
        (BulletType::event, _) => "o",
    }
}

fn format_line(
    bullet: &Bullet,
    state: &JournalState,
    visible: &HashSet<String>,
    exclude_content: bool,
) -> String {
    let depth = hierarchy::compute_depth(bullet, &state.bullets, visible);
    let mut line = format!(
        "{}{} [{}] {}",
        "  ".repeat(depth),
        signifier(bullet),
        bullet.id,
        bullet.content
    );

    if let Some(date) = bullet.date {
        line.push_str(&format!(" ({})", date));
    }
    if bullet.own_collection().is_none()
        && let Some(project) = hierarchy::resolve_effective_collection(bullet, &state.bullets)
    {
        line.push_str(&format!(" [project: {}, via parent note]", project));
    }
    if bullet.is_recurring() {
        line.push_str(" [recurring]");
    }
    line.push('\n');

    if !exclude_content && let Some(ref body) = bullet.long_form_content {
        line.push_str(&format!("{}  Note: {}\n", "  ".repeat(depth), body));
    }
    line
}

/// Format a listing into a display string
///
/// # Arguments
/// * `state` - The journal the bullets come from (for parents and collections)
/// * `bullets` - The listing, already filtered and sorted
/// * `exclude_content` - Whether to leave out long-form note bodies
pub fn format_bullets(state: &JournalState, bullets: &[&Bullet], exclude_content: bool) -> String {
    if bullets.is_empty() {
        return "No bullets found".to_string();
    }

    let visible = JournalState::visible_ids(bullets);
    let mut result = format!("Found {} bullet(s):\n\n", bullets.len());

    if !state.preferences.group_by_project {
        for bullet in bullets {
            result.push_str(&format_line(bullet, state, &visible, exclude_content));
        }
        return result;
    }

    let groups =
        hierarchy::group_by_effective_collection(bullets, &state.bullets, &state.collections);
    for (&project_id, members) in &groups.grouped {
        let title = state
            .find_collection(project_id)
            .map(|c| c.title.as_str())
            .unwrap_or(project_id);
        result.push_str(&format!("## {} ({})\n", title, project_id));
        for bullet in members {
            result.push_str(&format_line(bullet, state, &visible, exclude_content));
        }
        result.push('\n');
    }
    if !groups.unassigned.is_empty() {
        result.push_str("## Unassigned\n");
        for bullet in &groups.unassigned {
            result.push_str(&format_line(bullet, state, &visible, exclude_content));
        }
    }
    result
}

/// Format the collections list
pub fn format_collections(state: &JournalState, include_archived: bool) -> String {
    let collections: Vec<_> = state
        .collections
        .values()
        .filter(|c| include_archived || !c.archived)
        .collect();
    if collections.is_empty() {
        return "No collections found".to_string();
    }

    let mut result = format!("Found {} collection(s):\n\n", collections.len());
    for collection in collections {
        let count = state.bullets_in_collection(&collection.id).len();
        result.push_str(&format!(
            "- [{}] {} (type: {:?}, bullets: {}{})\n",
            collection.id,
            collection.title,
            collection.collection_type,
            count,
            if collection.archived { ", archived" } else { "" }
        ));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{Collection, CollectionType};

    fn journal() -> JournalState {
        let mut state = JournalState::new();
        let note = Bullet {
            id: "standup".to_string(),
            content: "Standup notes".to_string(),
            bullet_type: BulletType::note,
            collection_id: Some("work".to_string()),
            order: 1.0,
            ..Default::default()
        };
        let task = Bullet {
            id: "follow-up".to_string(),
            content: "Follow up with Sam".to_string(),
            parent_note_id: Some("standup".to_string()),
            order: 2.0,
            ..Default::default()
        };
        let loose = Bullet {
            id: "milk".to_string(),
            content: "Buy milk".to_string(),
            order: 3.0,
            ..Default::default()
        };
        for b in [note, task, loose] {
            state.bullets.insert(b.id.clone(), b);
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
        state
    }

    #[test]
    fn test_nested_task_is_indented_and_shows_inherited_project() {
        let state = journal();
        let listing = state.list_bullets(&Default::default());
        let output = format_bullets(&state, &listing, true);

        assert!(output.starts_with("Found 3 bullet(s):"));
        assert!(output.contains("- [standup] Standup notes\n"));
        assert!(output.contains(
            "  • [follow-up] Follow up with Sam [project: work, via parent note]\n"
        ));
        assert!(output.contains("• [milk] Buy milk\n"));
    }

    #[test]
    fn test_grouped_by_project() {
        let mut state = journal();
        state.preferences.group_by_project = true;
        let listing = state.list_bullets(&Default::default());
        let output = format_bullets(&state, &listing, true);

        let work = output.find("## Work (work)").unwrap();
        let unassigned = output.find("## Unassigned").unwrap();
        let follow_up = output.find("[follow-up]").unwrap();
        let milk = output.find("[milk]").unwrap();
        assert!(work < follow_up && follow_up < unassigned);
        assert!(unassigned < milk);
    }

    #[test]
    fn test_signifiers() {
        let mut bullet = Bullet::default();
        assert_eq!(signifier(&bullet), "•");
        bullet.state = BulletState::completed;
        assert_eq!(signifier(&bullet), "x");
        bullet.state = BulletState::migrated;
        assert_eq!(signifier(&bullet), ">");
        bullet.bullet_type = BulletType::event;
        bullet.state = BulletState::open;
        assert_eq!(signifier(&bullet), "o");
    }

    #[test]
    fn test_empty_listing() {
        let state = JournalState::new();
        assert_eq!(format_bullets(&state, &[], false), "No bullets found");
        assert_eq!(format_collections(&state, true), "No collections found");
    }
}
