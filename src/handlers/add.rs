//! Add handlers: logging bullets and creating collections

use crate::BujoServerHandler;
use crate::error::Error;
use crate::journal::{BulletType, CollectionType, JournalState};
use crate::note_content;
use crate::reducer::{Command, NewBullet, NewCollection};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

/// Check that `parent_id` names an existing note
pub(crate) fn check_parent_note(parent_id: &str, data: &JournalState) -> Result<(), String> {
    match data.find_bullet(parent_id) {
        None => Err(format!(
            "Parent note '{}' does not exist. Use list(type=\"note\") to see available notes.",
            parent_id
        )),
        Some(parent) if parent.bullet_type != BulletType::note => Err(format!(
            "Bullet '{}' is a {:?}, not a note. Only notes can have nested bullets.",
            parent_id, parent.bullet_type
        )),
        Some(_) => Ok(()),
    }
}

impl BujoServerHandler {
    /// Log a new bullet (task, note or event).
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_add_bullet(
        &self,
        id: String,
        content: String,
        bullet_type: Option<String>,
        date: Option<String>,
        collection_id: Option<String>,
        parent_note_id: Option<String>,
        long_form_content: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        if id.is_empty() {
            bail_public!(_, "Bullet ID must not be empty.");
        }
        if content.trim().is_empty() {
            bail_public!(_, "Bullet content must not be empty.");
        }

        let bullet_type = match bullet_type {
            Some(ref t) => validation::parse_bullet_type(t)?,
            None => BulletType::task,
        };
        let date = validation::parse_clearable_date(date.as_deref())?.flatten();
        let collection_id = validation::parse_clearable_id(collection_id).flatten();
        let parent_note_id = validation::parse_clearable_id(parent_note_id).flatten();
        if let Some(ref body) = long_form_content {
            validation::validate_note_body(body)?;
        }

        let mut data = self.lock_data();

        if data.contains_id(&id) {
            drop(data);
            bail_public!(_, "{}", Error::Duplicate { id });
        }
        if let Some(ref cid) = collection_id
            && data.find_collection(cid).is_none()
        {
            let msg = validation::format_invalid_collection_error(cid, &data);
            drop(data);
            bail_public!(_, "{}", msg);
        }
        if let Some(ref pid) = parent_note_id
            && let Err(msg) = check_parent_note(pid, &data)
        {
            drop(data);
            bail_public!(_, "{}", msg);
        }

        let long_form_content = long_form_content
            .filter(|body| !body.is_empty())
            .map(|body| note_content::clean_note_content(&body, &data.bullets));

        self.apply_locked(
            &mut data,
            Command::AddBullet(NewBullet {
                id: id.clone(),
                content,
                bullet_type,
                date,
                collection_id,
                parent_note_id,
                long_form_content,
            }),
        );
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Add {:?} {}", bullet_type, id)) {
            bail_public!(_, "Failed to save: {}", e);
        }

        Ok(format!(
            "Bullet created with ID: {} (type: {:?})",
            id, bullet_type
        ))
    }

    /// Create a project, list or future-log collection.
    pub async fn handle_add_collection(
        &self,
        id: String,
        title: String,
        collection_type: Option<String>,
    ) -> McpResult<String> {
        let id = validation::normalize_id(&id);
        if id.is_empty() {
            bail_public!(_, "Collection ID must not be empty.");
        }
        let collection_type = match collection_type {
            Some(ref t) => validation::parse_collection_type(t)?,
            None => CollectionType::project,
        };

        let mut data = self.lock_data();
        if data.contains_id(&id) {
            drop(data);
            bail_public!(_, "{}", Error::Duplicate { id });
        }
        self.apply_locked(
            &mut data,
            Command::AddCollection(NewCollection {
                id: id.clone(),
                title,
                collection_type,
            }),
        );
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Add collection {}", id)) {
            bail_public!(_, "Failed to save: {}", e);
        }

        Ok(format!(
            "Collection created with ID: {} (type: {:?})",
            id, collection_type
        ))
    }
}
