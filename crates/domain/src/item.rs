use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// Discoverable text attached to an item.
///
/// `discovered` is monotonic: the engine only ever flips it to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clue {
    pub content: String,
    #[serde(default)]
    pub discovered: bool,
}

impl Clue {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            discovered: false,
        }
    }
}

/// An addressable world entity.
///
/// Capabilities are optional fields layered over one record: `takeable` items
/// can enter the inventory, `unlocks` makes an item a tool for a specific
/// lock, `contains` makes it a container concealing other items, and `clue`
/// makes it a clue bearer. A single item may combine capabilities. The flag
/// fields `locked`, `taken`, and `hidden` are monotonic, resolved only by the
/// transition engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Short functional hint for the external intent recognizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    pub description: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub taken: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub takeable: bool,
    /// Tool capability: id of the one item this item unlocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocks: Option<ItemId>,
    /// Container capability: concealed items, revealed one at a time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue: Option<Clue>,
}

impl Item {
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aliases: Vec::new(),
            concept: None,
            description: description.into(),
            locked: false,
            taken: false,
            hidden: false,
            takeable: false,
            unlocks: None,
            contains: Vec::new(),
            clue: None,
        }
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    pub fn takeable(mut self) -> Self {
        self.takeable = true;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn unlocks(mut self, target: impl Into<ItemId>) -> Self {
        self.unlocks = Some(target.into());
        self
    }

    pub fn contains<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        self.contains = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_clue(mut self, content: impl Into<String>) -> Self {
        self.clue = Some(Clue::new(content));
        self
    }

    /// True when the item shows up in a room enumeration.
    pub fn is_visible(&self) -> bool {
        !self.taken && !self.hidden
    }

    /// True when the item carries a clue that has been discovered.
    pub fn clue_discovered(&self) -> bool {
        self.clue.as_ref().is_some_and(|c| c.discovered)
    }
}
