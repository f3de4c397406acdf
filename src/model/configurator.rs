use serde::{Deserialize, Serialize};

use crate::model::{GroupId, MediaId, OptionId, Selection};

/// Presentation type of a configurator, as stored on the configurator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfiguratorType {
    Standard,
    Selection,
    Picture,
}

impl ConfiguratorType {
    /// Numeric encoding used by the relational store (`configurator_sets.type`).
    pub fn from_store(value: i32) -> Self {
        match value {
            1 => ConfiguratorType::Selection,
            2 => ConfiguratorType::Picture,
            _ => ConfiguratorType::Standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: MediaId,
    pub file_name: String,
}

/// One concrete value within a group (e.g. "Red").
///
/// `selected`, `active` and `media` are request-scoped annotations computed
/// fresh on every call; they are never written back to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguratorOption {
    pub id: OptionId,
    pub group_id: GroupId,
    pub name: String,
    pub position: i32,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

impl ConfiguratorOption {
    pub fn new(id: OptionId, group_id: GroupId, name: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            group_id,
            name: name.into(),
            position,
            selected: false,
            active: false,
            media: None,
        }
    }
}

/// A named axis of variation (e.g. "Color") with its ordered options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub position: i32,
    #[serde(default)]
    pub selected: bool,
    pub options: Vec<ConfiguratorOption>,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            selected: false,
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<ConfiguratorOption>) -> Self {
        self.options = options;
        self
    }
}

/// The configurator tree handed to the rendering layer: all groups and
/// options of the product's configurator set, plus annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configurator {
    pub configurator_type: ConfiguratorType,
    pub groups: Vec<Group>,
}

impl Configurator {
    pub fn new(configurator_type: ConfiguratorType, groups: Vec<Group>) -> Self {
        Self {
            configurator_type,
            groups,
        }
    }

    /// True if some returned combination picks `option_id` for `group_id`.
    pub fn option_in_combinations(
        group_id: GroupId,
        option_id: OptionId,
        combinations: &[Selection],
    ) -> bool {
        combinations
            .iter()
            .any(|combination| combination.get(&group_id) == Some(&option_id))
    }
}
