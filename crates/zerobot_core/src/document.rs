use std::cmp::Ordering;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::kind::SectionKind;
use crate::section::ProfileSection;

const SCRIPTING_KEY: &str = "scripting";
const ENABLED_SCRIPTS_KEY: &str = "enabledScripts";

/// A loaded automation config. The JSON tree is kept as-is so keys the
/// editor does not understand survive a load/save cycle; sections are parsed
/// on demand and written back only when an operation succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: JsonMap<String, JsonValue>,
}

impl Document {
    pub fn parse<B: AsRef<[u8]>>(bytes: B) -> Result<Self, CoreError> {
        let value: JsonValue = serde_json::from_slice(bytes.as_ref()).map_err(|e| {
            CoreError::new(CoreErrorCode::Parse, format!("failed to parse JSON: {e}"))
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: JsonValue) -> Result<Self, CoreError> {
        match value {
            JsonValue::Object(root) => Ok(Self { root }),
            other => Err(CoreError::new(
                CoreErrorCode::Parse,
                format!(
                    "expected a JSON object at the top level, found {}",
                    json_type_name(&other)
                ),
            )),
        }
    }

    pub fn root(&self) -> &JsonMap<String, JsonValue> {
        &self.root
    }

    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.root.clone())
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.root.get(kind.key()).is_some_and(|v| !v.is_null())
    }

    pub fn section(&self, kind: SectionKind) -> Option<ProfileSection> {
        self.raw_section(kind)
            .map(|value| ProfileSection::from_json(kind, value))
    }

    /// The section, or an empty shell when the document has none.
    pub fn section_or_empty(&self, kind: SectionKind) -> ProfileSection {
        self.section(kind)
            .unwrap_or_else(|| ProfileSection::empty(kind))
    }

    pub fn put_section(&mut self, section: &ProfileSection) {
        self.root
            .insert(section.kind().key().to_string(), section.to_json());
    }

    pub fn raw_section(&self, kind: SectionKind) -> Option<&JsonValue> {
        self.root.get(kind.key()).filter(|v| !v.is_null())
    }

    pub fn set_raw_section(&mut self, kind: SectionKind, value: JsonValue) {
        self.root.insert(kind.key().to_string(), value);
    }

    pub fn present_sections(&self) -> Vec<SectionKind> {
        SectionKind::ALL
            .into_iter()
            .filter(|&kind| self.has_section(kind))
            .collect()
    }

    pub fn enabled_scripts(&self) -> Vec<String> {
        self.enabled_scripts_value()
            .map(|scripts| {
                scripts
                    .iter()
                    .map(|s| match s {
                        JsonValue::String(name) => name.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sorts `scripting.enabledScripts` by case-insensitive name. Returns
    /// false when the document has no script list.
    pub fn sort_enabled_scripts(&mut self) -> bool {
        let Some(scripts) = self
            .root
            .get_mut(SCRIPTING_KEY)
            .and_then(|s| s.get_mut(ENABLED_SCRIPTS_KEY))
            .and_then(JsonValue::as_array_mut)
        else {
            return false;
        };

        scripts.sort_by(compare_script_names);
        true
    }

    fn enabled_scripts_value(&self) -> Option<&Vec<JsonValue>> {
        self.root
            .get(SCRIPTING_KEY)
            .and_then(|s| s.get(ENABLED_SCRIPTS_KEY))
            .and_then(JsonValue::as_array)
    }
}

fn compare_script_names(a: &JsonValue, b: &JsonValue) -> Ordering {
    let key = |v: &JsonValue| match v {
        JsonValue::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    };
    key(a).cmp(&key(b)).then_with(|| a.to_string().cmp(&b.to_string()))
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
