//! Friends and the items they interacted with

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Identifier of a [`SocialEntry`]
pub type FriendId = u32;

/// A friend in the user's social graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialEntry {
    pub id: FriendId,

    pub name: String,

    #[serde(rename = "avatar", default)]
    pub avatar_ref: String,

    /// Items this friend liked or scrapped. May reference ids the current
    /// catalog no longer carries.
    #[serde(rename = "mutualLikes", default)]
    pub mutual_interaction_ids: Vec<ItemId>,
}

impl SocialEntry {
    pub fn new(id: FriendId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar_ref: String::new(),
            mutual_interaction_ids: Vec::new(),
        }
    }

    pub fn with_interactions(mut self, ids: impl IntoIterator<Item = ItemId>) -> Self {
        self.mutual_interaction_ids = ids.into_iter().collect();
        self
    }
}
