use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Targeting,
    MagicShooter,
    Equipment,
    Healing,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        Self::Targeting,
        Self::MagicShooter,
        Self::Equipment,
        Self::Healing,
    ];

    /// Key of the section object inside a document.
    pub fn key(&self) -> &'static str {
        match *self {
            Self::Targeting => "targeting",
            Self::MagicShooter => "magicShooter",
            Self::Equipment => "equipment",
            Self::Healing => "healing",
        }
    }

    /// Key of the payload array inside the section object.
    pub fn list_key(&self) -> &'static str {
        match *self {
            Self::Targeting | Self::MagicShooter => "list",
            Self::Equipment => "equipmentList",
            Self::Healing => "healingList",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Targeting => "Targeting",
            Self::MagicShooter => "Magic Shooter",
            Self::Equipment => "Equipment",
            Self::Healing => "Healing",
        }
    }

    /// Targeting payloads are lists of monster entries with a `name` field;
    /// every other kind carries opaque payloads.
    pub fn has_named_entries(&self) -> bool {
        matches!(self, Self::Targeting)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Lenient parser for user input: case-insensitive, ignores `-`, `_` and
    /// spaces, and accepts the `targetting` spelling used by the old UI.
    pub fn parse_user_input(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "targeting" | "targetting" | "target" => Some(Self::Targeting),
            "magicshooter" | "magic" | "shooter" => Some(Self::MagicShooter),
            "equipment" | "equip" => Some(Self::Equipment),
            "healing" | "heal" => Some(Self::Healing),
            _ => None,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
