//! List handlers for the bullet journal MCP server

use crate::BujoServerHandler;
use crate::formatting;
use crate::hierarchy;
use crate::journal::BulletQuery;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl BujoServerHandler {
    /// Handles list/filter operations - applies filters and formats results for display.
    ///
    /// `collection_id` matches on the effective project, so bullets nested
    /// under a project's notes are listed with it.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_list(
        &self,
        date: Option<String>,
        state: Option<String>,
        bullet_type: Option<String>,
        keyword: Option<String>,
        collection_id: Option<String>,
        undated: Option<bool>,
        exclude_content: Option<bool>,
    ) -> McpResult<String> {
        let query = BulletQuery {
            date: match date {
                Some(ref d) => Some(validation::parse_date(d)?),
                None => None,
            },
            state: match state {
                Some(ref s) => Some(validation::parse_state(s)?),
                None => None,
            },
            bullet_type: match bullet_type {
                Some(ref t) => Some(validation::parse_bullet_type(t)?),
                None => None,
            },
            keyword: keyword.filter(|k| !k.trim().is_empty()),
            undated: undated.unwrap_or(false),
        };
        let collection_id = collection_id
            .map(|id| validation::normalize_id(&id))
            .filter(|id| !id.is_empty());

        let data = self.lock_data();
        if let Some(ref cid) = collection_id
            && data.find_collection(cid).is_none()
        {
            let msg = validation::format_invalid_collection_error(cid, &data);
            drop(data);
            bail_public!(_, "{}", msg);
        }

        let mut bullets = data.list_bullets(&query);
        if let Some(ref cid) = collection_id {
            bullets.retain(|b| {
                hierarchy::resolve_effective_collection(b, &data.bullets) == Some(cid.as_str())
            });
        }

        Ok(formatting::format_bullets(
            &data,
            &bullets,
            exclude_content.unwrap_or(false),
        ))
    }

    /// List collections with their bullet counts.
    pub async fn handle_list_collections(
        &self,
        include_archived: Option<bool>,
    ) -> McpResult<String> {
        let data = self.lock_data();
        Ok(formatting::format_collections(
            &data,
            include_archived.unwrap_or(false),
        ))
    }
}
