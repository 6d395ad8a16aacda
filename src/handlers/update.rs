//! Update handlers for the bullet journal MCP server

use crate::BujoServerHandler;
use crate::error::Error;
use crate::handlers::add::check_parent_note;
use crate::journal::{BulletState, PreferenceKey};
use crate::note_content;
use crate::reducer::{self, BulletPatch, CollectionPatch, Command};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use std::collections::HashSet;

impl BujoServerHandler {
    /// Update bullet fields. Use ""(empty string) to clear optional fields.
    /// The ID cannot be changed.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update_bullet(
        &self,
        id: String,
        content: Option<String>,
        bullet_type: Option<String>,
        date: Option<String>,
        collection_id: Option<String>,
        parent_note_id: Option<String>,
        long_form_content: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        let mut patch = BulletPatch {
            content: content.filter(|c| !c.trim().is_empty()),
            bullet_type: match bullet_type {
                Some(ref t) => Some(validation::parse_bullet_type(t)?),
                None => None,
            },
            date: validation::parse_clearable_date(date.as_deref())?,
            collection_id: validation::parse_clearable_id(collection_id),
            parent_note_id: validation::parse_clearable_id(parent_note_id),
            ..Default::default()
        };
        if let Some(ref body) = long_form_content {
            validation::validate_note_body(body)?;
        }

        let mut data = self.lock_data();

        if data.find_bullet(&id).is_none() {
            drop(data);
            bail_public!(
                _,
                "{}. Use list() to see available bullets.",
                Error::bullet_not_found(id)
            );
        }
        if let Some(Some(ref cid)) = patch.collection_id
            && data.find_collection(cid).is_none()
        {
            let msg = validation::format_invalid_collection_error(cid, &data);
            drop(data);
            bail_public!(_, "{}", msg);
        }
        if let Some(Some(ref pid)) = patch.parent_note_id {
            if *pid == id {
                drop(data);
                bail_public!(_, "Bullet '{}' cannot be its own parent note.", id);
            }
            if let Err(msg) = check_parent_note(pid, &data) {
                drop(data);
                bail_public!(_, "{}", msg);
            }
        }

        patch.long_form_content = long_form_content.map(|body| {
            if body.is_empty() {
                None
            } else {
                Some(note_content::clean_note_content(&body, &data.bullets))
            }
        });

        self.apply_locked(
            &mut data,
            Command::UpdateBullet {
                id: id.clone(),
                patch,
            },
        );
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Update bullet {}", id)) {
            bail_public!(_, "Failed to save: {}", e);
        }

        Ok(format!("Bullet {} updated successfully", id))
    }

    /// Change the state of one or more bullets. Unknown or migrated IDs are
    /// reported individually; the call fails only when none could be changed.
    pub async fn handle_set_state(&self, ids: Vec<String>, state: String) -> McpResult<String> {
        if ids.is_empty() {
            bail_public!(_, "No IDs provided. Please specify at least one bullet ID.");
        }
        let new_state = validation::parse_state(&state)?;
        if new_state == BulletState::migrated {
            bail_public!(
                _,
                "State 'migrated' cannot be set directly. Use migrate() to carry a bullet to another day."
            );
        }

        let mut data = self.lock_data();

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for id in ids.iter().map(|id| validation::normalize_id(id)) {
            match data.find_bullet(&id) {
                Some(bullet) if bullet.state == BulletState::migrated => {
                    failures.push(format!("{}: already migrated", id))
                }
                Some(bullet) => successes.push((id, bullet.state)),
                None => failures.push(format!("{}: not found", id)),
            }
        }

        if !successes.is_empty() {
            self.apply_locked(
                &mut data,
                Command::UpdateBullets {
                    ids: successes.iter().map(|(id, _)| id.clone()).collect(),
                    patch: BulletPatch {
                        state: Some(new_state),
                        ..Default::default()
                    },
                },
            );
        }
        drop(data);

        if !successes.is_empty() {
            let subject = if successes.len() == 1 {
                successes[0].0.clone()
            } else {
                format!("{} bullets", successes.len())
            };
            if let Err(e) =
                self.save_data_with_message(&format!("Set {} to {:?}", subject, new_state))
            {
                bail_public!(_, "Failed to save: {}", e);
            }
        }

        let mut response = String::new();
        if !successes.is_empty() {
            response.push_str(&format!(
                "Changed state for {} bullet{}:\n",
                successes.len(),
                if successes.len() == 1 { "" } else { "s" }
            ));
            for (id, old_state) in &successes {
                response.push_str(&format!("- {}: {:?} → {:?}\n", id, old_state, new_state));
            }
        }
        if !failures.is_empty() {
            if !response.is_empty() {
                response.push('\n');
            }
            response.push_str(&format!(
                "Failed to change state for {} bullet{}:\n",
                failures.len(),
                if failures.len() == 1 { "" } else { "s" }
            ));
            for failure in &failures {
                response.push_str(&format!("- {}\n", failure));
            }
        }

        if successes.is_empty() {
            bail_public!(_, "{}", response.trim());
        }
        Ok(response.trim().to_string())
    }

    /// Put bullets in the given sequence. The bullets trade their current
    /// sort positions, so bullets not named keep their place.
    pub async fn handle_reorder_bullets(&self, ids: Vec<String>) -> McpResult<String> {
        let ids: Vec<String> = ids.iter().map(|id| validation::normalize_id(id)).collect();
        if ids.is_empty() {
            bail_public!(_, "No IDs provided. Please specify the bullet IDs in the desired order.");
        }
        let mut seen = HashSet::new();
        if let Some(dup) = ids.iter().find(|id| !seen.insert(id.as_str())) {
            bail_public!(_, "Bullet '{}' is listed more than once.", dup);
        }

        let mut data = self.lock_data();
        if let Some(missing) = ids.iter().find(|id| data.find_bullet(id).is_none()) {
            let err = Error::bullet_not_found(missing);
            drop(data);
            bail_public!(_, "{}. Use list() to see available bullets.", err);
        }

        let slots = reducer::order_slots(&ids, &data.bullets);
        self.apply_locked(&mut data, Command::ReorderBullets(slots));
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Reorder {} bullets", ids.len())) {
            bail_public!(_, "Failed to save: {}", e);
        }
        Ok(format!("Reordered {} bullet(s): {}", ids.len(), ids.join(", ")))
    }

    /// Rename, retype, reorder or (un)archive a collection.
    pub async fn handle_update_collection(
        &self,
        id: String,
        title: Option<String>,
        collection_type: Option<String>,
        order: Option<f64>,
        archived: Option<bool>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let patch = CollectionPatch {
            title: title.filter(|t| !t.trim().is_empty()),
            collection_type: match collection_type {
                Some(ref t) => Some(validation::parse_collection_type(t)?),
                None => None,
            },
            archived,
        };
        if let Some(order) = order
            && !order.is_finite()
        {
            bail_public!(_, "Invalid order '{}'. Use a finite number.", order);
        }

        let mut data = self.lock_data();
        if data.find_collection(&id).is_none() {
            let msg = validation::format_invalid_collection_error(&id, &data);
            drop(data);
            bail_public!(_, "{}", msg);
        }
        self.apply_locked(
            &mut data,
            Command::UpdateCollection {
                id: id.clone(),
                patch,
            },
        );
        if let Some(order) = order {
            self.apply_locked(&mut data, Command::ReorderCollections(vec![(id.clone(), order)]));
        }
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Update collection {}", id)) {
            bail_public!(_, "Failed to save: {}", e);
        }
        Ok(format!("Collection {} updated successfully", id))
    }

    /// Flip one of the listing preferences.
    pub async fn handle_toggle_preference(&self, key: String) -> McpResult<String> {
        let key: PreferenceKey = match key.trim().parse() {
            Ok(k) => k,
            Err(msg) => {
                bail_public!(_, "{}", msg);
            }
        };

        let mut data = self.lock_data();
        self.apply_locked(&mut data, Command::TogglePreference(key));
        let preferences = data.preferences.clone();
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Toggle {:?}", key)) {
            bail_public!(_, "Failed to save: {}", e);
        }
        Ok(format!(
            "Preferences: group_by_project={}, show_completed={}, sort_by_type={}",
            preferences.group_by_project, preferences.show_completed, preferences.sort_by_type
        ))
    }
}
