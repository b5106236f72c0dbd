//! Tag-set reconciliation.
//!
//! Tags on a MemoryDB resource are merged from two sources: stack-level
//! tags attached by the orchestrator and resource-level tags declared on
//! the model. This module merges the two views and computes the minimal
//! add/remove delta that transforms one merged tag set into another.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Ordered tag key -> tag value map.
pub type TagMap = BTreeMap<String, String>;

/// A single resource-level tag as declared on a model.
///
/// The value is optional at the wire level. A tag with an absent value is
/// treated as not present when converting to a [`TagMap`]; a tag with an
/// empty-string value is retained.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Tag key.
    #[validate(length(min = 1, max = 128))]
    pub key: String,
    /// Tag value; absence means "not a tag", not "tag with empty value".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 256))]
    pub value: Option<String>,
}

/// Tag mutations needed to move a resource from `previous` to `desired`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDelta {
    /// Tags to create or redefine.
    pub to_add: TagMap,
    /// Tag keys to remove.
    pub to_remove: BTreeSet<String>,
}

impl Tag {
    /// Creates a tag with a value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// Converts declared tags to a map, dropping value-less entries.
///
/// Later duplicate keys win, matching map-merge semantics elsewhere.
#[must_use]
pub fn tag_map(tags: &[Tag]) -> TagMap {
    tags.iter()
        .filter_map(|tag| tag.value.as_ref().map(|v| (tag.key.clone(), v.clone())))
        .collect()
}

/// Converts a tag map back to the declared list form.
#[must_use]
pub fn tag_list(map: &TagMap) -> Vec<Tag> {
    map.iter()
        .map(|(key, value)| Tag::new(key.clone(), value.clone()))
        .collect()
}

/// Merges stack-level and resource-level tags into one view.
///
/// Stack-level tags are loaded first; resource-level tags are superimposed
/// and win on key collision.
#[must_use]
pub fn merged_tags(stack: Option<&TagMap>, resource: Option<&[Tag]>) -> TagMap {
    let mut merged = stack.cloned().unwrap_or_default();
    if let Some(tags) = resource {
        merged.extend(tag_map(tags));
    }
    merged
}

/// Computes the tags the caller desires to define or redefine.
///
/// A desired entry is included if its key is absent from `previous` or its
/// value differs from the previous value.
#[must_use]
pub fn tags_to_add(previous: &TagMap, desired: &TagMap) -> TagMap {
    desired
        .iter()
        .filter(|(key, value)| previous.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Computes the tag keys present previously but absent from the desired set.
#[must_use]
pub fn tags_to_remove(previous: &TagMap, desired: &TagMap) -> BTreeSet<String> {
    previous
        .keys()
        .filter(|key| !desired.contains_key(*key))
        .cloned()
        .collect()
}

impl TagDelta {
    /// Computes the full delta between two merged tag maps.
    #[must_use]
    pub fn between(previous: &TagMap, desired: &TagMap) -> Self {
        Self {
            to_add: tags_to_add(previous, desired),
            to_remove: tags_to_remove(previous, desired),
        }
    }

    /// Returns true if no tag mutation is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}
