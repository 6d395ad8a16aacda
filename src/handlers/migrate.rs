//! Migrate handler: carry an open bullet forward to another day

use crate::BujoServerHandler;
use crate::error::Error;
use crate::reducer::Command;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use uuid::Uuid;

impl BujoServerHandler {
    /// Migrate a bullet to `target_date`.
    ///
    /// Bullets owned by a project are re-dated in place. Others are closed as
    /// migrated and re-logged on the target day under a new ID.
    pub async fn handle_migrate(&self, id: String, target_date: String) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        let target_date = validation::parse_date(&target_date)?;

        let mut data = self.lock_data();
        let Some(bullet) = data.find_bullet(&id) else {
            drop(data);
            bail_public!(
                _,
                "{}. Use list() to see available bullets.",
                Error::bullet_not_found(id)
            );
        };
        if bullet.state.is_closed() {
            let state = bullet.state;
            drop(data);
            bail_public!(
                _,
                "Bullet '{}' is {:?} and cannot be migrated. Only open or scheduled bullets move forward.",
                id,
                state
            );
        }
        let project = bullet.own_collection().map(str::to_string);

        let new_id = Uuid::now_v7().to_string();
        self.apply_locked(
            &mut data,
            Command::MigrateBullet {
                id: id.clone(),
                target_date,
                new_id: new_id.clone(),
            },
        );
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Migrate {} to {}", id, target_date)) {
            bail_public!(_, "Failed to save: {}", e);
        }

        Ok(match project {
            Some(project) => format!(
                "Bullet {} moved to {} (stays in project {})",
                id, target_date, project
            ),
            None => format!(
                "Bullet {} migrated to {} as new bullet ID: {}",
                id, target_date, new_id
            ),
        })
    }
}
