//! Rich note bodies
//!
//! A note's `long_form_content` is a JSON document tree. Tasks written inline
//! appear as `embeddedTask` nodes pointing at a bullet by id; these helpers
//! keep those pointers consistent with the bullet map.

use crate::journal::Bullet;
use serde_json::Value;
use std::collections::BTreeMap;

const EMBEDDED_TASK: &str = "embeddedTask";

/// Remove `embeddedTask` nodes whose bullet no longer exists, at any depth
///
/// Empty input gives an empty string. Input that is not JSON is returned
/// unchanged.
pub fn clean_note_content(raw: &str, bullets: &BTreeMap<String, Bullet>) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let Ok(mut doc) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };
    if let Some(nodes) = doc.get_mut("content").and_then(Value::as_array_mut) {
        clean_nodes(nodes, bullets);
    }
    serde_json::to_string(&doc).unwrap_or_else(|_| raw.to_string())
}

fn clean_nodes(nodes: &mut Vec<Value>, bullets: &BTreeMap<String, Bullet>) {
    nodes.retain_mut(|node| {
        if node.get("type").and_then(Value::as_str) == Some(EMBEDDED_TASK)
            && let Some(bullet_id) = node.pointer("/attrs/bulletId").and_then(Value::as_str)
        {
            return bullets.contains_key(bullet_id);
        }
        if let Some(children) = node.get_mut("content").and_then(Value::as_array_mut) {
            clean_nodes(children, bullets);
        }
        true
    });
}

/// Point embedded references to `old_id` at `new_id` instead
pub fn replace_bullet_reference(raw: &str, old_id: &str, new_id: &str) -> String {
    let old = format!("\"bulletId\":\"{}\"", old_id);
    let new = format!("\"bulletId\":\"{}\"", new_id);
    raw.replace(&old, &new)
}

/// Whether `content` embeds the bullet `bullet_id`
pub fn references_bullet(raw: &str, bullet_id: &str) -> bool {
    raw.contains(&format!("\"bulletId\":\"{}\"", bullet_id))
}

/// Accept only absolute http(s), mailto and tel links
pub fn is_valid_url(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    ["http://", "https://", "mailto:", "tel:"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

/// Link targets in a note body that fail [`is_valid_url`]
pub fn unsafe_links(raw: &str) -> Vec<String> {
    let Ok(doc) = serde_json::from_str::<Value>(raw) else {
        return Vec::new();
    };
    let mut found = Vec::new();
    collect_unsafe_links(&doc, &mut found);
    found
}

fn collect_unsafe_links(value: &Value, found: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("link")
                && let Some(href) = value.pointer("/attrs/href").and_then(Value::as_str)
                && !is_valid_url(href)
            {
                found.push(href.to_string());
            }
            for child in map.values() {
                collect_unsafe_links(child, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_unsafe_links(item, found);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bullets(ids: &[&str]) -> BTreeMap<String, Bullet> {
        ids.iter()
            .map(|id| {
                (
                    id.to_string(),
                    Bullet {
                        id: id.to_string(),
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    fn task_node(id: &str) -> Value {
        json!({"type": "embeddedTask", "attrs": {"bulletId": id}})
    }

    #[test]
    fn test_removes_orphaned_tasks_at_any_depth() {
        let doc = json!({
            "type": "doc",
            "content": [
                task_node("kept"),
                task_node("gone"),
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [task_node("gone-too"), task_node("kept")]}
                ]}
            ]
        });
        let cleaned: Value =
            serde_json::from_str(&clean_note_content(&doc.to_string(), &bullets(&["kept"])))
                .unwrap();

        let expected = json!({
            "type": "doc",
            "content": [
                task_node("kept"),
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [task_node("kept")]}
                ]}
            ]
        });
        assert_eq!(cleaned, expected);
    }

    #[test]
    fn test_empty_and_invalid_input() {
        assert_eq!(clean_note_content("", &bullets(&[])), "");
        assert_eq!(clean_note_content("not json", &bullets(&[])), "not json");
    }

    #[test]
    fn test_replace_reference() {
        let raw = task_node("old").to_string();
        let replaced = replace_bullet_reference(&raw, "old", "new");
        assert!(references_bullet(&replaced, "new"));
        assert!(!references_bullet(&replaced, "old"));
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("  HTTP://example.com"));
        assert!(is_valid_url("mailto:me@example.com"));
        assert!(is_valid_url("tel:+123"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_unsafe_links_found_in_marks() {
        let doc = json!({
            "type": "doc",
            "content": [{"type": "paragraph", "content": [
                {"type": "text", "text": "ok", "marks": [{"type": "link", "attrs": {"href": "https://example.com"}}]},
                {"type": "text", "text": "bad", "marks": [{"type": "link", "attrs": {"href": "javascript:void(0)"}}]}
            ]}]
        });
        assert_eq!(unsafe_links(&doc.to_string()), vec!["javascript:void(0)"]);
        assert!(unsafe_links("plain text").is_empty());
    }
}
