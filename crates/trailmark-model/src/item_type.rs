//! Closed set of item categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category tag carried by every checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Boss fight
    Boss,
    /// Dungeon or catacomb
    Dungeon,
    /// Character questline step
    Npc,
    /// Weapon or armor pickup
    Gear,
    /// Talisman pickup
    Talisman,
    /// Ash of war or spirit ash
    Ash,
    /// Map fragment
    Map,
    /// General quest step
    Quest,
    /// Missable or point-of-no-return warning
    Warning,
}

impl ItemType {
    /// Every category, in display order
    pub const ALL: [ItemType; 9] = [
        ItemType::Boss,
        ItemType::Dungeon,
        ItemType::Npc,
        ItemType::Gear,
        ItemType::Talisman,
        ItemType::Ash,
        ItemType::Map,
        ItemType::Quest,
        ItemType::Warning,
    ];

    /// Wire name of the category
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boss => "boss",
            Self::Dungeon => "dungeon",
            Self::Npc => "npc",
            Self::Gear => "gear",
            Self::Talisman => "talisman",
            Self::Ash => "ash",
            Self::Map => "map",
            Self::Quest => "quest",
            Self::Warning => "warning",
        }
    }

    /// Look up a category by its wire name (exact match)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a name outside the closed category set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item type: '{0}'")]
pub struct UnknownItemType(pub String);

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownItemType(s.to_string()))
    }
}
