//! Parent-note hierarchy over the flat bullet map
//!
//! Bullets form a forest through `parent_note_id`. The links are plain ids,
//! so a parent may have been deleted (dangling) or the user may have built a
//! loop. Both are ordinary data here: every walk keeps a visited set and a
//! hard depth cap, and degrades to "no inheritance" or "no indentation".

use crate::journal::{Bullet, Collection};
use std::collections::{BTreeMap, HashSet};

/// Walks longer than this give up on inheritance
pub const MAX_INHERITANCE_DEPTH: usize = 50;

/// Indentation never exceeds this many levels
pub const MAX_DEPTH: usize = 10;

/// The project a bullet belongs to, inherited through its parent notes
///
/// A bullet's own `collection_id` always wins. Otherwise the nearest ancestor
/// with a `collection_id` decides, so moving a note to another project moves
/// every bullet nested under it without rewriting them.
///
/// Returns `None` when no ancestor has a project, a parent is missing, the
/// chain loops, or the chain is deeper than [`MAX_INHERITANCE_DEPTH`].
pub fn resolve_effective_collection<'a>(
    bullet: &'a Bullet,
    all: &'a BTreeMap<String, Bullet>,
) -> Option<&'a str> {
    if let Some(own) = bullet.own_collection() {
        return Some(own);
    }

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(bullet.id.as_str());
    let mut current = bullet;

    while let Some(parent_id) = current.parent_id() {
        if !visited.insert(parent_id) || visited.len() > MAX_INHERITANCE_DEPTH {
            return None;
        }
        let parent = all.get(parent_id)?;
        if let Some(collection) = parent.own_collection() {
            return Some(collection);
        }
        current = parent;
    }
    None
}

/// Indentation level of a bullet within the visible list
///
/// Counts parent hops while each parent exists and is in `visible`. A hidden
/// parent ends the chain, so a filtered-out note never leaves its children
/// indented under nothing. Capped at [`MAX_DEPTH`]; a loop is counted once
/// around before stopping.
pub fn compute_depth(
    bullet: &Bullet,
    all: &BTreeMap<String, Bullet>,
    visible: &HashSet<String>,
) -> usize {
    let mut depth = 0;
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = bullet;

    while let Some(parent_id) = current.parent_id() {
        let Some(parent) = all.get(parent_id) else {
            break;
        };
        if !visited.insert(parent_id) || !visible.contains(parent_id) {
            break;
        }
        depth += 1;
        current = parent;
        if depth >= MAX_DEPTH {
            break;
        }
    }
    depth
}

/// Direct children of a note, ordered by `order`
pub fn children_of<'a>(parent_id: &str, all: &'a BTreeMap<String, Bullet>) -> Vec<&'a Bullet> {
    let mut children: Vec<&Bullet> = all
        .values()
        .filter(|b| b.parent_id() == Some(parent_id))
        .collect();
    children.sort_by(|a, b| a.order.total_cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    children
}

/// A listing split by effective project
#[derive(Debug, Default)]
pub struct ProjectGroups<'a> {
    /// Project id to its bullets, in listing order
    pub grouped: BTreeMap<&'a str, Vec<&'a Bullet>>,
    /// Bullets with no (existing) effective project
    pub unassigned: Vec<&'a Bullet>,
}

/// Group a listing by effective project
///
/// A bullet whose effective project is not in `collections` (deleted
/// project) is treated as unassigned.
pub fn group_by_effective_collection<'a>(
    bullets: &[&'a Bullet],
    all: &'a BTreeMap<String, Bullet>,
    collections: &BTreeMap<String, Collection>,
) -> ProjectGroups<'a> {
    let mut groups = ProjectGroups::default();
    for &bullet in bullets {
        match resolve_effective_collection(bullet, all) {
            Some(project) if collections.contains_key(project) => {
                groups.grouped.entry(project).or_default().push(bullet)
            }
            _ => groups.unassigned.push(bullet),
        }
    }
    groups
}
