use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::kind::SectionKind;
use crate::section::{MAX_PROFILES, ProfileSection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Self::First, Self::Second];

    pub fn index(&self) -> usize {
        match *self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            _ => None,
        }
    }

    pub fn other(&self) -> Self {
        match *self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {}", self.index() + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSummary {
    pub index: usize,
    pub name: String,
    pub display_name: String,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSummary {
    pub kind: SectionKind,
    pub capacity: usize,
    pub profiles: Vec<ProfileSummary>,
}

impl SectionSummary {
    pub fn of(section: &ProfileSection) -> Self {
        Self {
            kind: section.kind(),
            capacity: MAX_PROFILES,
            profiles: section
                .profiles()
                .iter()
                .enumerate()
                .map(|(index, profile)| ProfileSummary {
                    index,
                    name: profile.name.clone(),
                    display_name: profile.display_name(index),
                    entries: profile.entry_count(),
                })
                .collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.profiles.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSummary {
    pub slot: Slot,
    pub sections: Vec<SectionSummary>,
    pub enabled_scripts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub kind: SectionKind,
    pub slot: Slot,
    pub profile_index: usize,
    pub payload: JsonValue,
}

/// The profile being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSource {
    pub slot: Slot,
    pub kind: SectionKind,
    pub index: usize,
}

/// Where a dragged profile was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    /// Released on top of an existing profile.
    Profile {
        slot: Slot,
        kind: SectionKind,
        index: usize,
    },
    /// Released on empty space in a profile list.
    List { slot: Slot, kind: SectionKind },
}

impl DropTarget {
    pub fn slot(&self) -> Slot {
        match *self {
            Self::Profile { slot, .. } | Self::List { slot, .. } => slot,
        }
    }

    pub fn kind(&self) -> SectionKind {
        match *self {
            Self::Profile { kind, .. } | Self::List { kind, .. } => kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropOutcome {
    Unchanged,
    Reordered { from: usize, to: usize },
    Copied { slot: Slot, final_name: String },
}
