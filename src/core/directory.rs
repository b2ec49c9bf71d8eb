//! Group registry abstraction

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub emoji: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

pub trait GroupDirectory: Send + Sync {
    fn resolve(&self, group_id: &str) -> Option<Group>;

    /// Where the group's transaction table lives, if it has one yet.
    fn data_location(&self, group_id: &str) -> Option<PathBuf>;

    fn list_members(&self, group_ids: &[String]) -> BTreeSet<String> {
        group_ids
            .iter()
            .filter_map(|id| self.resolve(id))
            .flat_map(|group| group.members)
            .collect()
    }
}
