use log::warn;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::kind::SectionKind;
use crate::profile::Profile;

pub const MAX_PROFILES: usize = 10;

const PROFILE_KEYS: &str = "profileKeys";
const PROFILE_MODIFIERS: &str = "profileModifiers";
const PROFILE_NAMES: &str = "profileNames";

/// All profiles of one kind inside a document. The on-disk form keeps four
/// parallel arrays; here each profile is a single record so structural edits
/// always move payload, key, modifier and name together.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSection {
    kind: SectionKind,
    profiles: Vec<Profile>,
    // Original section object. Unrelated keys are re-emitted as loaded and
    // the four arrays are overwritten in place by `to_json`.
    raw: JsonMap<String, JsonValue>,
}

impl ProfileSection {
    pub fn empty(kind: SectionKind) -> Self {
        Self {
            kind,
            profiles: Vec::new(),
            raw: JsonMap::new(),
        }
    }

    pub fn from_profiles(kind: SectionKind, profiles: Vec<Profile>) -> Self {
        Self {
            kind,
            profiles,
            raw: JsonMap::new(),
        }
    }

    /// Reads a section object. Arrays of different lengths are truncated to
    /// the shortest one; a value that is not an object reads as empty.
    pub fn from_json(kind: SectionKind, value: &JsonValue) -> Self {
        let Some(raw) = value.as_object() else {
            warn!("{} section is not an object; treating it as empty", kind.key());
            return Self::empty(kind);
        };

        let payloads = array_field(raw, kind.list_key());
        let keys = array_field(raw, PROFILE_KEYS);
        let modifiers = array_field(raw, PROFILE_MODIFIERS);
        let names = array_field(raw, PROFILE_NAMES);

        let count = payloads
            .len()
            .min(keys.len())
            .min(modifiers.len())
            .min(names.len());
        if [payloads.len(), keys.len(), modifiers.len(), names.len()]
            .iter()
            .any(|&len| len != count)
        {
            warn!(
                "{} section has mismatched arrays ({}={}, {}={}, {}={}, {}={}); using {} profiles",
                kind.key(),
                kind.list_key(),
                payloads.len(),
                PROFILE_KEYS,
                keys.len(),
                PROFILE_MODIFIERS,
                modifiers.len(),
                PROFILE_NAMES,
                names.len(),
                count
            );
        }

        let profiles = (0..count)
            .map(|i| Profile {
                payload: payloads[i].clone(),
                key: keys[i].clone(),
                modifier: modifiers[i].clone(),
                name: names[i].as_str().unwrap_or_default().to_string(),
            })
            .collect();

        Self {
            kind,
            profiles,
            raw: raw.clone(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        let mut out = self.raw.clone();
        out.insert(
            self.kind.list_key().to_string(),
            self.column(|p| p.payload.clone()),
        );
        out.insert(PROFILE_KEYS.to_string(), self.column(|p| p.key.clone()));
        out.insert(
            PROFILE_MODIFIERS.to_string(),
            self.column(|p| p.modifier.clone()),
        );
        out.insert(
            PROFILE_NAMES.to_string(),
            self.column(|p| JsonValue::String(p.name.clone())),
        );
        JsonValue::Object(out)
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn profile(&self, index: usize) -> Result<&Profile, CoreError> {
        self.profiles
            .get(index)
            .ok_or_else(|| CoreError::index_out_of_range(index, self.effective_count()))
    }

    pub fn effective_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    pub fn resolve_unique_name(&self, candidate: &str) -> String {
        if !self.contains_name(candidate) {
            return candidate.to_string();
        }

        (1..)
            .map(|n| format!("{candidate} ({n})"))
            .find(|name| !self.contains_name(name))
            .unwrap_or_else(|| candidate.to_string())
    }

    /// Appends a profile, suffixing its name on collision. Returns the name
    /// the profile was stored under.
    pub fn insert_profile(&mut self, mut profile: Profile) -> Result<String, CoreError> {
        self.ensure_room_for(1)?;

        let final_name = self.resolve_unique_name(&profile.name);
        profile.name = final_name.clone();
        self.profiles.push(profile);
        Ok(final_name)
    }

    pub fn delete_profile(&mut self, index: usize) -> Result<String, CoreError> {
        self.check_index(index)?;
        if self.effective_count() == 1 {
            return Err(CoreError::new(
                CoreErrorCode::MinimumPopulation,
                format!(
                    "cannot delete the last {} profile; a section keeps at least one",
                    self.kind
                ),
            ));
        }

        Ok(self.profiles.remove(index).name)
    }

    pub fn rename_profile(&mut self, index: usize, new_name: &str) -> Result<(), CoreError> {
        self.check_index(index)?;

        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::EmptyName,
                "profile name must not be empty",
            ));
        }

        let taken = self
            .profiles
            .iter()
            .enumerate()
            .any(|(i, p)| i != index && p.name == new_name);
        if taken {
            return Err(CoreError::new(
                CoreErrorCode::DuplicateName,
                format!("a {} profile named \"{new_name}\" already exists", self.kind),
            ));
        }

        self.profiles[index].name = new_name.to_string();
        Ok(())
    }

    /// Moves the profile at `from` so it ends up at `to`; everything in
    /// between shifts by one.
    pub fn reorder_profile(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        if from == to {
            return Ok(());
        }
        self.check_index(from)?;
        self.check_index(to)?;

        let profile = self.profiles.remove(from);
        self.profiles.insert(to, profile);
        Ok(())
    }

    pub fn sort_by_payload_name(&mut self, index: usize) -> Result<(), CoreError> {
        self.ensure_named_entries()?;
        self.check_index(index)?;

        self.profiles[index].sort_entries_by_name();
        Ok(())
    }

    /// Sorts the payload of every profile. Returns how many payloads were
    /// sortable arrays.
    pub fn sort_all_payloads_by_name(&mut self) -> Result<usize, CoreError> {
        self.ensure_named_entries()?;

        Ok(self
            .profiles
            .iter_mut()
            .map(Profile::sort_entries_by_name)
            .filter(|&sorted| sorted)
            .count())
    }

    /// Overwrites only the payload at `index`.
    pub fn replace_payload(&mut self, index: usize, payload: JsonValue) -> Result<(), CoreError> {
        self.check_index(index)?;
        self.profiles[index].payload = payload;
        Ok(())
    }

    pub(crate) fn ensure_room_for(&self, additional: usize) -> Result<(), CoreError> {
        if self.effective_count() + additional > MAX_PROFILES {
            return Err(CoreError::new(
                CoreErrorCode::CapacityExceeded,
                format!(
                    "{} section would hold {} profiles; the limit is {MAX_PROFILES}",
                    self.kind,
                    self.effective_count() + additional
                ),
            ));
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), CoreError> {
        if index >= self.effective_count() {
            return Err(CoreError::index_out_of_range(index, self.effective_count()));
        }
        Ok(())
    }

    fn ensure_named_entries(&self) -> Result<(), CoreError> {
        if !self.kind.has_named_entries() {
            return Err(CoreError::new(
                CoreErrorCode::UnsupportedOperation,
                format!("{} payloads have no named entries to sort", self.kind),
            ));
        }
        Ok(())
    }

    fn column(&self, f: impl Fn(&Profile) -> JsonValue) -> JsonValue {
        JsonValue::Array(self.profiles.iter().map(f).collect())
    }
}

fn array_field<'a>(raw: &'a JsonMap<String, JsonValue>, key: &str) -> &'a [JsonValue] {
    raw.get(key)
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
