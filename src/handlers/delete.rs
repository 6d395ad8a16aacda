//! Delete handlers for the bullet journal MCP server

use crate::BujoServerHandler;
use crate::error::Error;
use crate::hierarchy;
use crate::note_content;
use crate::reducer::{BulletPatch, Command};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl BujoServerHandler {
    /// Permanently delete a bullet. Notes that still have nested bullets
    /// cannot be deleted; a parent note that embedded the bullet is cleaned.
    pub async fn handle_delete_bullet(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        let mut data = self.lock_data();
        let Some(bullet) = data.find_bullet(&id) else {
            drop(data);
            bail_public!(
                _,
                "{}. Use list() to see available bullets.",
                Error::bullet_not_found(id)
            );
        };
        let parent_id = bullet.parent_id().map(str::to_string);

        let children: Vec<String> = hierarchy::children_of(&id, &data.bullets)
            .iter()
            .map(|b| b.id.clone())
            .collect();
        if !children.is_empty() {
            drop(data);
            bail_public!(
                _,
                "Cannot delete '{}': bullets {} are nested under it. Move or delete them first.",
                id,
                children.join(", ")
            );
        }

        self.apply_locked(&mut data, Command::DeleteBullet(id.clone()));

        let cleaned = parent_id.as_deref().and_then(|pid| {
            let parent = data.find_bullet(pid)?;
            let body = parent.long_form_content.as_deref()?;
            note_content::references_bullet(body, &id)
                .then(|| (pid.to_string(), note_content::clean_note_content(body, &data.bullets)))
        });
        if let Some((pid, body)) = cleaned {
            self.apply_locked(
                &mut data,
                Command::UpdateBullet {
                    id: pid,
                    patch: BulletPatch {
                        long_form_content: Some(Some(body)),
                        ..Default::default()
                    },
                },
            );
        }
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Delete bullet {}", id)) {
            bail_public!(_, "Failed to save: {}", e);
        }
        Ok(format!("Bullet {} deleted", id))
    }

    /// Permanently delete a collection that no bullet is assigned to.
    pub async fn handle_delete_collection(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);

        let mut data = self.lock_data();
        if data.find_collection(&id).is_none() {
            let msg = validation::format_invalid_collection_error(&id, &data);
            drop(data);
            bail_public!(_, "{}", msg);
        }
        let assigned = data.bullets_in_collection(&id).len();
        if assigned > 0 {
            drop(data);
            bail_public!(
                _,
                "Cannot delete collection '{}': {} bullet(s) are assigned to it. Archive it instead with update_collection(archived=true).",
                id,
                assigned
            );
        }

        self.apply_locked(&mut data, Command::DeleteCollection(id.clone()));
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Delete collection {}", id)) {
            bail_public!(_, "Failed to save: {}", e);
        }
        Ok(format!("Collection {} deleted", id))
    }
}
