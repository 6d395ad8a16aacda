//! Recurring handler: expand a rule into a series of dated bullets

use crate::BujoServerHandler;
use crate::handlers::add::check_parent_note;
use crate::journal::BulletType;
use crate::recurrence::{self, RecurrenceConfig, SeriesTemplate};
use crate::reducer::Command;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl BujoServerHandler {
    /// Create one bullet per occurrence of a recurrence rule, at most one
    /// year ahead and at most the configured limit.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_add_recurring(
        &self,
        content: String,
        start_date: String,
        frequency: String,
        interval: Option<i64>,
        month_day: Option<u32>,
        month_week: Option<i32>,
        month_week_day: Option<u32>,
        end_date: Option<String>,
        bullet_type: Option<String>,
        collection_id: Option<String>,
        parent_note_id: Option<String>,
    ) -> McpResult<String> {
        if content.trim().is_empty() {
            bail_public!(_, "Bullet content must not be empty.");
        }
        let start = validation::parse_date(&start_date)?;
        let config = RecurrenceConfig {
            month_day,
            month_week,
            month_week_day,
            end_date: validation::parse_clearable_date(end_date.as_deref())?.flatten(),
            ..RecurrenceConfig::new(
                validation::parse_frequency(&frequency)?,
                interval.unwrap_or(1),
            )
        };
        let template = SeriesTemplate {
            content,
            bullet_type: match bullet_type {
                Some(ref t) => validation::parse_bullet_type(t)?,
                None => BulletType::task,
            },
            collection_id: validation::parse_clearable_id(collection_id).flatten(),
            parent_note_id: validation::parse_clearable_id(parent_note_id).flatten(),
        };

        let mut data = self.lock_data();
        if let Some(ref cid) = template.collection_id
            && data.find_collection(cid).is_none()
        {
            let msg = validation::format_invalid_collection_error(cid, &data);
            drop(data);
            bail_public!(_, "{}", msg);
        }
        if let Some(ref pid) = template.parent_note_id
            && let Err(msg) = check_parent_note(pid, &data)
        {
            drop(data);
            bail_public!(_, "{}", msg);
        }

        let bullets = match recurrence::expand_series(
            &template,
            start,
            &config,
            self.recurrence_limit,
            self.clock.as_ref(),
        ) {
            Ok(bullets) => bullets,
            Err(e) => {
                drop(data);
                return Err(validation::to_mcp_error(e));
            }
        };
        if bullets.is_empty() {
            drop(data);
            bail_public!(
                _,
                "The rule produced no dates between {} and its end date.",
                start
            );
        }

        let series_id = bullets[0].recurring_id.clone().unwrap_or_default();
        let mut response = format!(
            "Created {} recurring bullet(s) in series {}:\n",
            bullets.len(),
            series_id
        );
        for bullet in &bullets {
            if let Some(date) = bullet.date {
                response.push_str(&format!("- [{}] {}\n", bullet.id, date));
            }
        }
        let count = bullets.len();

        self.apply_locked(&mut data, Command::AddBullets(bullets));
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!(
            "Add recurring series {} ({} bullets)",
            series_id, count
        )) {
            bail_public!(_, "Failed to save: {}", e);
        }

        Ok(response.trim_end().to_string())
    }
}
