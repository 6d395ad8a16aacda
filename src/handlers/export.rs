//! Export handler: write a filtered backup of the journal as JSON

use crate::BujoServerHandler;
use crate::export::{self, DateRange, ExportOptions};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use std::collections::BTreeSet;
use std::fs;

impl BujoServerHandler {
    /// Export bullets and collections filtered by date range and excluded
    /// projects. Undated bullets are always included unless their project is
    /// excluded. Returns the JSON, or writes it to `path` when given.
    pub async fn handle_export(
        &self,
        date_range: Option<String>,
        exclude_collections: Option<Vec<String>>,
        path: Option<String>,
    ) -> McpResult<String> {
        let date_range = match date_range {
            Some(ref r) => validation::parse_date_range(r)?,
            None => DateRange::All,
        };
        let excluded: BTreeSet<String> = exclude_collections
            .unwrap_or_default()
            .iter()
            .map(|id| validation::normalize_id(id))
            .filter(|id| !id.is_empty())
            .collect();

        let data = self.lock_data();
        if let Some(unknown) = excluded.iter().find(|id| data.find_collection(id).is_none()) {
            let msg = validation::format_invalid_collection_error(unknown, &data);
            drop(data);
            bail_public!(_, "{}", msg);
        }

        let options = ExportOptions {
            date_range,
            excluded_collection_ids: excluded,
        };
        let filtered = export::filter_for_export(&data, &options, self.clock.as_ref());
        drop(data);

        let json = export::export_to_json(&filtered).map_err(validation::to_mcp_error)?;

        let Some(path) = path.filter(|p| !p.trim().is_empty()) else {
            return Ok(json);
        };
        if let Err(e) = fs::write(&path, &json) {
            bail_public!(_, "Failed to write export to {}: {}", path, e);
        }

        let bounds = match date_range.interval(self.clock.today()) {
            Some((start, end)) => format!("{} to {}", start, end),
            None => "all dates".to_string(),
        };
        Ok(format!(
            "Exported {} bullet(s) and {} collection(s) ({}) to {}",
            filtered.bullets.len(),
            filtered.collections.len(),
            bounds,
            path
        ))
    }
}
