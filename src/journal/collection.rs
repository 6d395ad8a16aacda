use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of a collection
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionType {
    /// A multi-step outcome
    project,
    /// A plain list
    list,
    /// Items scheduled for later months
    future_log,
}

impl FromStr for CollectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(CollectionType::project),
            "list" => Ok(CollectionType::list),
            "future_log" => Ok(CollectionType::future_log),
            _ => Err(format!(
                "Invalid collection type '{}'. Valid options are: project, list, future_log",
                s
            )),
        }
    }
}

/// A project or list grouping bullets
///
/// Collections are flat: there is no nesting among them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique identifier (e.g., "website-redesign")
    pub id: String,
    /// Display title
    pub title: String,
    /// project, list or future_log
    #[serde(rename = "type")]
    pub collection_type: CollectionType,
    /// Creation time, epoch millis
    pub created_at: i64,
    /// Sidebar sort key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    /// Hidden from the active project list
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,
}
