use std::fmt::Write as _;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};
use zerobot_core::core_api::SectionSummary;
use zerobot_core::document::Document;
use zerobot_core::kind::SectionKind;
use zerobot_core::section::ProfileSection;

const SHEET_WIDTH: usize = 76;
const INDEX_COL_WIDTH: usize = 4;
const NAME_COL_WIDTH: usize = 28;
const KEY_COL_WIDTH: usize = 12;
const MODIFIER_COL_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonIndent {
    #[default]
    Two,
    Four,
}

impl JsonIndent {
    pub fn from_width(width: u8) -> Option<Self> {
        match width {
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    fn as_bytes(&self) -> &'static [u8] {
        match *self {
            Self::Two => b"  ",
            Self::Four => b"    ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    pub verbose: bool,
    pub section: Option<SectionKind>,
}

/// The document as it should be written back to disk.
pub fn render_document(document: &Document, indent: JsonIndent) -> Result<String, serde_json::Error> {
    render_value(&document.to_value(), indent)
}

pub fn render_value(value: &JsonValue, indent: JsonIndent) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf).expect("serde_json always emits UTF-8"))
}

pub fn render_summary_json(document: &Document) -> JsonValue {
    render_summary_json_selected(document, None)
}

pub fn render_summary_json_selected(document: &Document, only: Option<SectionKind>) -> JsonValue {
    let mut out = JsonMap::new();

    out.insert(
        "sections".to_string(),
        JsonValue::Array(
            sections_of(document, only)
                .iter()
                .map(|section| section_to_json(&SectionSummary::of(section)))
                .collect(),
        ),
    );
    if only.is_none() {
        out.insert(
            "enabled_scripts".to_string(),
            JsonValue::Array(
                document
                    .enabled_scripts()
                    .into_iter()
                    .map(JsonValue::String)
                    .collect(),
            ),
        );
    }

    JsonValue::Object(out)
}

pub fn render_overview(document: &Document) -> String {
    render_overview_with_options(document, TextRenderOptions::default())
}

pub fn render_overview_with_options(document: &Document, options: TextRenderOptions) -> String {
    let mut out = String::new();
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "{}",
        centered_no_trailing("ZEROBOT PROFILE MANAGER", SHEET_WIDTH)
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    let sections = sections_of(document, options.section);
    if sections.is_empty() {
        writeln!(&mut out, " No profile sections.").expect("writing to String cannot fail");
    }
    for section in &sections {
        write_section(&mut out, section, options.verbose);
    }

    if options.section.is_none() {
        let scripts = document.enabled_scripts();
        writeln!(&mut out, " ::: Enabled Scripts ({}) :::", scripts.len())
            .expect("writing to String cannot fail");
        for script in &scripts {
            writeln!(&mut out, "   {script}").expect("writing to String cannot fail");
        }
    }

    out
}

fn sections_of(document: &Document, only: Option<SectionKind>) -> Vec<ProfileSection> {
    SectionKind::ALL
        .into_iter()
        .filter(|kind| only.is_none_or(|o| o == *kind))
        .filter_map(|kind| document.section(kind))
        .collect()
}

fn section_to_json(summary: &SectionSummary) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "section".to_string(),
        JsonValue::String(summary.kind.key().to_string()),
    );
    out.insert("count".to_string(), JsonValue::from(summary.count()));
    out.insert("capacity".to_string(), JsonValue::from(summary.capacity));
    out.insert(
        "profiles".to_string(),
        JsonValue::Array(
            summary
                .profiles
                .iter()
                .map(|p| {
                    let mut profile = JsonMap::new();
                    profile.insert("index".to_string(), JsonValue::from(p.index));
                    profile.insert(
                        "name".to_string(),
                        JsonValue::String(p.display_name.clone()),
                    );
                    profile.insert("entries".to_string(), JsonValue::from(p.entries));
                    JsonValue::Object(profile)
                })
                .collect(),
        ),
    );
    JsonValue::Object(out)
}

fn write_section(out: &mut String, section: &ProfileSection, verbose: bool) {
    let summary = SectionSummary::of(section);
    writeln!(
        out,
        " ::: {} ({}/{}) :::",
        summary.kind,
        summary.count(),
        summary.capacity
    )
    .expect("writing to String cannot fail");

    let header = format!(
        "   {:<i$}{:<n$}{:<k$}{:<m$}{}",
        "#",
        "Name",
        "Key",
        "Mod",
        "Entries",
        i = INDEX_COL_WIDTH,
        n = NAME_COL_WIDTH,
        k = KEY_COL_WIDTH,
        m = MODIFIER_COL_WIDTH
    );
    writeln!(out, "{}", header.trim_end()).expect("writing to String cannot fail");

    for (profile, row) in section.profiles().iter().zip(&summary.profiles) {
        let line = format!(
            "   {:<i$}{:<n$}{:<k$}{:<m$}{}",
            row.index + 1,
            fit_column(&row.display_name, NAME_COL_WIDTH - 2),
            fit_column(&scalar_text(&profile.key), KEY_COL_WIDTH - 2),
            fit_column(&scalar_text(&profile.modifier), MODIFIER_COL_WIDTH - 2),
            row.entries,
            i = INDEX_COL_WIDTH,
            n = NAME_COL_WIDTH,
            k = KEY_COL_WIDTH,
            m = MODIFIER_COL_WIDTH
        );
        writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");

        if verbose && section.kind().has_named_entries() {
            for entry in profile.payload.as_array().into_iter().flatten() {
                let name = entry
                    .get("name")
                    .and_then(JsonValue::as_str)
                    .unwrap_or("?");
                writeln!(out, "       - {name}").expect("writing to String cannot fail");
            }
        }
    }
    writeln!(out).expect("writing to String cannot fail");
}

fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn centered_no_trailing(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }

    let left_padding = (width - len) / 2;
    format!("{}{}", " ".repeat(left_padding), value)
}
