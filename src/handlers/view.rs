//! View handler: which log the journal opens on

use crate::BujoServerHandler;
use crate::journal::ViewMode;
use crate::reducer::{Command, ViewChange};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl BujoServerHandler {
    /// Switch the stored view. Collection mode needs an existing collection;
    /// a missing date keeps the current one.
    pub async fn handle_set_view(
        &self,
        mode: String,
        date: Option<String>,
        collection_id: Option<String>,
    ) -> McpResult<String> {
        let mode = validation::parse_view_mode(&mode)?;
        let date = match date {
            Some(ref d) if !d.trim().is_empty() => Some(validation::parse_date(d)?),
            _ => None,
        };
        let collection_id = collection_id
            .map(|id| validation::normalize_id(&id))
            .filter(|id| !id.is_empty());

        let mut data = self.lock_data();
        match (mode, collection_id.as_deref()) {
            (ViewMode::collection, None) => {
                drop(data);
                bail_public!(_, "Collection view requires collection_id.");
            }
            (_, Some(cid)) if data.find_collection(cid).is_none() => {
                let msg = validation::format_invalid_collection_error(cid, &data);
                drop(data);
                bail_public!(_, "{}", msg);
            }
            _ => {}
        }

        self.apply_locked(
            &mut data,
            Command::SetView(ViewChange {
                mode,
                date,
                collection_id,
            }),
        );
        let view = data.view.clone();
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Set view {:?}", view.mode)) {
            bail_public!(_, "Failed to save: {}", e);
        }
        Ok(match view.collection_id {
            Some(cid) => format!("View: {:?} {} (collection: {})", view.mode, view.date, cid),
            None => format!("View: {:?} {}", view.mode, view.date),
        })
    }
}
