use crate::core::config::{AppConfig, GroupConfig};
use crate::core::directory::{Group, GroupDirectory};
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

impl From<&GroupConfig> for Group {
    fn from(config: &GroupConfig) -> Self {
        Group {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            emoji: config.emoji.clone(),
            members: config.members.clone(),
        }
    }
}

/// Groups declared in the application config.
#[derive(Debug, Clone)]
pub struct ConfigGroupDirectory {
    groups: Vec<GroupConfig>,
    data_dir: PathBuf,
}

impl ConfigGroupDirectory {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            groups: config.groups.clone(),
            data_dir: config.data_dir()?,
        })
    }

    fn find(&self, group_id: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.id == group_id)
    }
}

impl GroupDirectory for ConfigGroupDirectory {
    fn resolve(&self, group_id: &str) -> Option<Group> {
        self.find(group_id).map(Group::from)
    }

    fn data_location(&self, group_id: &str) -> Option<PathBuf> {
        let data_file = self.find(group_id)?.data_file.as_ref()?;
        // join() keeps absolute paths as they are
        Some(self.data_dir.join(data_file))
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryGroupDirectory {
    groups: HashMap<String, (Group, Option<PathBuf>)>,
}

impl MemoryGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: Group, location: Option<&str>) {
        self.groups
            .insert(group.id.clone(), (group, location.map(PathBuf::from)));
    }
}

impl GroupDirectory for MemoryGroupDirectory {
    fn resolve(&self, group_id: &str) -> Option<Group> {
        self.groups.get(group_id).map(|(group, _)| group.clone())
    }

    fn data_location(&self, group_id: &str) -> Option<PathBuf> {
        self.groups
            .get(group_id)
            .and_then(|(_, location)| location.clone())
    }
}
