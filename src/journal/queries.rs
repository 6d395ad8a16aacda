//! Query methods for JournalState
//!
//! Read-only lookups used by the MCP handlers to build listings.

use super::bullet::{Bullet, BulletState, BulletType};
use super::journal_data::JournalState;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Selection criteria for listing bullets
#[derive(Debug, Clone, Default)]
pub struct BulletQuery {
    /// Only bullets logged on this day
    pub date: Option<NaiveDate>,
    /// Only bullets in this state
    pub state: Option<BulletState>,
    /// Only bullets of this kind
    pub bullet_type: Option<BulletType>,
    /// Case-insensitive substring of the content
    pub keyword: Option<String>,
    /// Only undated bullets
    pub undated: bool,
}

impl BulletQuery {
    fn matches(&self, bullet: &Bullet) -> bool {
        if let Some(date) = self.date
            && bullet.date != Some(date)
        {
            return false;
        }
        if self.undated && bullet.date.is_some() {
            return false;
        }
        if let Some(state) = self.state
            && bullet.state != state
        {
            return false;
        }
        if let Some(bullet_type) = self.bullet_type
            && bullet.bullet_type != bullet_type
        {
            return false;
        }
        if let Some(ref keyword) = self.keyword {
            return bullet
                .content
                .to_lowercase()
                .contains(&keyword.to_lowercase());
        }
        true
    }
}

fn type_rank(bullet_type: BulletType) -> u8 {
    match bullet_type {
        BulletType::event => 0,
        BulletType::task => 1,
        BulletType::note => 2,
    }
}

impl JournalState {
    /// Bullets matching `query`, honouring the `show_completed` and
    /// `sort_by_type` preferences.
    ///
    /// Ordered by date (undated last), then by type when `sort_by_type` is on,
    /// then by `order`.
    pub fn list_bullets(&self, query: &BulletQuery) -> Vec<&Bullet> {
        let show_completed = self.preferences.show_completed;
        let mut bullets: Vec<&Bullet> = self
            .bullets
            .values()
            .filter(|b| show_completed || !b.state.is_closed() || query.state == Some(b.state))
            .filter(|b| query.matches(b))
            .collect();

        let sort_by_type = self.preferences.sort_by_type;
        bullets.sort_by(|a, b| {
            let by_date = match (a.date, b.date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            let by_type = if sort_by_type {
                type_rank(a.bullet_type).cmp(&type_rank(b.bullet_type))
            } else {
                Ordering::Equal
            };
            by_date
                .then(by_type)
                .then(a.order.total_cmp(&b.order))
                .then_with(|| a.id.cmp(&b.id))
        });
        bullets
    }

    /// Ids of a listing, used as the visible set for depth computation
    pub fn visible_ids(bullets: &[&Bullet]) -> HashSet<String> {
        bullets.iter().map(|b| b.id.clone()).collect()
    }

    /// Bullets directly assigned to a collection
    pub fn bullets_in_collection(&self, collection_id: &str) -> Vec<&Bullet> {
        self.bullets
            .values()
            .filter(|b| b.own_collection() == Some(collection_id))
            .collect()
    }
}
