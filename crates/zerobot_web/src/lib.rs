use log::debug;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use zerobot_core::core_api::host::{
    copy_with_notice, delete_with_confirm, drop_with_notice, rename_with_prompt,
};
use zerobot_core::core_api::{
    CoreError, CoreErrorCode, DragSource, DropOutcome, DropTarget, EditorHost, NoticeKind,
    ProfileStore, Slot,
};
use zerobot_core::kind::SectionKind;
use zerobot_render::{JsonIndent, render_document, render_overview, render_summary_json};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProfileRef {
    pub slot: u8,
    pub section: String,
    pub index: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TransferOptions {
    pub source: u8,
    pub target: u8,
    pub section: String,
    /// Only read by `copy_profile`.
    pub index: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DropOptions {
    pub source: ProfileRef,
    pub target_slot: u8,
    pub target_section: String,
    /// `None` when released on the list rather than on a profile.
    pub target_index: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ReorderOptions {
    pub slot: u8,
    pub section: String,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SortOptions {
    pub slot: u8,
    pub index: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub indent: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Notice {
    message: String,
    kind: NoticeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct DropResult {
    action: &'static str,
    from: Option<usize>,
    to: Option<usize>,
    final_name: Option<String>,
}

impl From<DropOutcome> for DropResult {
    fn from(outcome: DropOutcome) -> Self {
        match outcome {
            DropOutcome::Unchanged => Self {
                action: "unchanged",
                from: None,
                to: None,
                final_name: None,
            },
            DropOutcome::Reordered { from, to } => Self {
                action: "reordered",
                from: Some(from),
                to: Some(to),
                final_name: None,
            },
            DropOutcome::Copied { final_name, .. } => Self {
                action: "copied",
                from: None,
                to: None,
                final_name: Some(final_name),
            },
        }
    }
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        let code = match err.code {
            CoreErrorCode::Parse => "parse_failed",
            CoreErrorCode::DocumentNotLoaded => "document_not_loaded",
            CoreErrorCode::SectionNotFound => "section_not_found",
            CoreErrorCode::IndexOutOfRange => "index_out_of_range",
            CoreErrorCode::CapacityExceeded => "capacity_exceeded",
            CoreErrorCode::DuplicateName => "duplicate_name",
            CoreErrorCode::EmptyName => "empty_name",
            CoreErrorCode::MinimumPopulation => "minimum_population",
            CoreErrorCode::ClipboardEmpty => "clipboard_empty",
            CoreErrorCode::SectionMismatch => "section_mismatch",
            CoreErrorCode::UnsupportedOperation => "unsupported_operation",
        };
        Self::new(code, err.message)
    }
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = window, js_name = confirm)]
    fn window_confirm(message: &str) -> bool;

    #[wasm_bindgen(js_namespace = window, js_name = prompt)]
    fn window_prompt(message: &str, default: &str) -> Option<String>;
}

/// Queues notices for the page and asks questions through the browser's
/// built-in dialogs.
struct BrowserHost<'a> {
    notices: &'a mut Vec<Notice>,
}

impl EditorHost for BrowserHost<'_> {
    fn notify(&mut self, message: &str, kind: NoticeKind) {
        self.notices.push(Notice {
            message: message.to_string(),
            kind,
        });
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        window_confirm(prompt)
    }

    fn prompt_text(&mut self, prompt: &str, default: &str) -> Option<String> {
        window_prompt(prompt, default)
    }
}

#[wasm_bindgen]
#[derive(Default)]
pub struct EditorSession {
    store: ProfileStore,
    notices: Vec<Notice>,
}

#[wasm_bindgen]
impl EditorSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_file(&mut self, slot: u8, bytes: &[u8]) -> Result<(), JsValue> {
        load_file_impl(&mut self.store, slot, bytes).map_err(|err| err.to_js_value())
    }

    pub fn remove_file(&mut self, slot: u8) -> Result<bool, JsValue> {
        let slot = parse_slot(slot).map_err(|err| err.to_js_value())?;
        Ok(self.store.remove_document(slot).is_some())
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.notices.clear();
    }

    pub fn is_loaded(&self, slot: u8) -> bool {
        parse_slot(slot).is_ok_and(|slot| self.store.is_loaded(slot))
    }

    /// Section of the profile on the clipboard, if any.
    pub fn clipboard_section(&self) -> Option<String> {
        self.store
            .clipboard()
            .map(|entry| entry.kind.key().to_string())
    }

    pub fn summary(&self, slot: u8) -> Result<JsValue, JsValue> {
        summary_impl(&self.store, slot)
            .and_then(|value| to_js(&value))
            .map_err(|err| err.to_js_value())
    }

    pub fn overview(&self, slot: u8) -> Result<String, JsValue> {
        overview_impl(&self.store, slot).map_err(|err| err.to_js_value())
    }

    pub fn copy_profile(&mut self, options: JsValue) -> Result<String, JsValue> {
        let options: TransferOptions = parse_options(options).map_err(|err| err.to_js_value())?;
        let mut host = BrowserHost {
            notices: &mut self.notices,
        };
        copy_profile_impl(&mut self.store, &mut host, &options).map_err(|err| err.to_js_value())
    }

    pub fn drop_profile(&mut self, options: JsValue) -> Result<JsValue, JsValue> {
        let options: DropOptions = parse_options(options).map_err(|err| err.to_js_value())?;
        let mut host = BrowserHost {
            notices: &mut self.notices,
        };
        drop_profile_impl(&mut self.store, &mut host, &options)
            .and_then(|result| to_js(&result))
            .map_err(|err| err.to_js_value())
    }

    pub fn replace_section(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: TransferOptions = parse_options(options).map_err(|err| err.to_js_value())?;
        replace_section_impl(&mut self.store, &options).map_err(|err| err.to_js_value())
    }

    pub fn merge_section(&mut self, options: JsValue) -> Result<u32, JsValue> {
        let options: TransferOptions = parse_options(options).map_err(|err| err.to_js_value())?;
        merge_section_impl(&mut self.store, &options)
            .map(|appended| appended as u32)
            .map_err(|err| err.to_js_value())
    }

    pub fn copy_to_clipboard(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: ProfileRef = parse_options(options).map_err(|err| err.to_js_value())?;
        copy_to_clipboard_impl(&mut self.store, &options).map_err(|err| err.to_js_value())
    }

    pub fn paste_from_clipboard(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: ProfileRef = parse_options(options).map_err(|err| err.to_js_value())?;
        paste_from_clipboard_impl(&mut self.store, &options).map_err(|err| err.to_js_value())
    }

    /// Resolves to the new name, or `undefined` when the prompt is cancelled.
    pub fn rename_profile(&mut self, options: JsValue) -> Result<Option<String>, JsValue> {
        let options: ProfileRef = parse_options(options).map_err(|err| err.to_js_value())?;
        let mut host = BrowserHost {
            notices: &mut self.notices,
        };
        rename_profile_impl(&mut self.store, &mut host, &options).map_err(|err| err.to_js_value())
    }

    /// Resolves to the removed name, or `undefined` when not confirmed.
    pub fn delete_profile(&mut self, options: JsValue) -> Result<Option<String>, JsValue> {
        let options: ProfileRef = parse_options(options).map_err(|err| err.to_js_value())?;
        let mut host = BrowserHost {
            notices: &mut self.notices,
        };
        delete_profile_impl(&mut self.store, &mut host, &options).map_err(|err| err.to_js_value())
    }

    pub fn reorder_profile(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: ReorderOptions = parse_options(options).map_err(|err| err.to_js_value())?;
        reorder_profile_impl(&mut self.store, &options).map_err(|err| err.to_js_value())
    }

    pub fn sort_targeting(&mut self, options: JsValue) -> Result<u32, JsValue> {
        let options: SortOptions = parse_options(options).map_err(|err| err.to_js_value())?;
        sort_targeting_impl(&mut self.store, &options)
            .map(|sorted| sorted as u32)
            .map_err(|err| err.to_js_value())
    }

    pub fn sort_scripts(&mut self, slot: u8) -> Result<bool, JsValue> {
        let slot = parse_slot(slot).map_err(|err| err.to_js_value())?;
        self.store
            .sort_enabled_scripts(slot)
            .map_err(|err| WebError::from(err).to_js_value())
    }

    pub fn export(&self, slot: u8, options: JsValue) -> Result<String, JsValue> {
        let options: ExportOptions = parse_options(options).map_err(|err| err.to_js_value())?;
        export_impl(&self.store, slot, &options).map_err(|err| err.to_js_value())
    }

    /// Drains the notices raised since the last call.
    pub fn take_notices(&mut self) -> Result<JsValue, JsValue> {
        let notices = std::mem::take(&mut self.notices);
        to_js(&notices).map_err(|err| err.to_js_value())
    }
}

fn load_file_impl(store: &mut ProfileStore, slot: u8, bytes: &[u8]) -> Result<(), WebError> {
    let slot = parse_slot(slot)?;
    if bytes.is_empty() {
        return Err(WebError::new(
            "unsupported_file",
            "The uploaded file is empty. Please provide a profile JSON file.",
        ));
    }
    store.load_bytes(slot, bytes)?;
    Ok(())
}

fn summary_impl(store: &ProfileStore, slot: u8) -> Result<serde_json::Value, WebError> {
    let slot = parse_slot(slot)?;
    let document = loaded_document(store, slot)?;
    Ok(render_summary_json(document))
}

fn overview_impl(store: &ProfileStore, slot: u8) -> Result<String, WebError> {
    let slot = parse_slot(slot)?;
    Ok(render_overview(loaded_document(store, slot)?))
}

fn copy_profile_impl<H: EditorHost>(
    store: &mut ProfileStore,
    host: &mut H,
    options: &TransferOptions,
) -> Result<String, WebError> {
    let source = parse_slot(options.source)?;
    let target = parse_slot(options.target)?;
    let kind = parse_section(&options.section)?;
    Ok(copy_with_notice(
        store,
        host,
        source,
        target,
        kind,
        options.index,
    )?)
}

fn drop_profile_impl<H: EditorHost>(
    store: &mut ProfileStore,
    host: &mut H,
    options: &DropOptions,
) -> Result<DropResult, WebError> {
    let source = DragSource {
        slot: parse_slot(options.source.slot)?,
        kind: parse_section(&options.source.section)?,
        index: options.source.index,
    };
    let slot = parse_slot(options.target_slot)?;
    let kind = parse_section(&options.target_section)?;
    let target = match options.target_index {
        Some(index) => DropTarget::Profile { slot, kind, index },
        None => DropTarget::List { slot, kind },
    };
    Ok(drop_with_notice(store, host, source, target)?.into())
}

fn replace_section_impl(store: &mut ProfileStore, options: &TransferOptions) -> Result<(), WebError> {
    let source = parse_slot(options.source)?;
    let target = parse_slot(options.target)?;
    let kind = parse_section(&options.section)?;
    store.replace_section(source, target, kind)?;
    Ok(())
}

fn merge_section_impl(store: &mut ProfileStore, options: &TransferOptions) -> Result<usize, WebError> {
    let source = parse_slot(options.source)?;
    let target = parse_slot(options.target)?;
    let kind = parse_section(&options.section)?;
    Ok(store.merge_section(source, target, kind)?)
}

fn copy_to_clipboard_impl(store: &mut ProfileStore, options: &ProfileRef) -> Result<(), WebError> {
    let slot = parse_slot(options.slot)?;
    let kind = parse_section(&options.section)?;
    store.copy_to_clipboard(slot, kind, options.index)?;
    Ok(())
}

fn paste_from_clipboard_impl(
    store: &mut ProfileStore,
    options: &ProfileRef,
) -> Result<(), WebError> {
    let slot = parse_slot(options.slot)?;
    let kind = parse_section(&options.section)?;
    store.paste_from_clipboard(slot, kind, options.index)?;
    Ok(())
}

fn rename_profile_impl<H: EditorHost>(
    store: &mut ProfileStore,
    host: &mut H,
    options: &ProfileRef,
) -> Result<Option<String>, WebError> {
    let slot = parse_slot(options.slot)?;
    let kind = parse_section(&options.section)?;
    Ok(rename_with_prompt(store, host, slot, kind, options.index)?)
}

fn delete_profile_impl<H: EditorHost>(
    store: &mut ProfileStore,
    host: &mut H,
    options: &ProfileRef,
) -> Result<Option<String>, WebError> {
    let slot = parse_slot(options.slot)?;
    let kind = parse_section(&options.section)?;
    Ok(delete_with_confirm(store, host, slot, kind, options.index)?)
}

fn reorder_profile_impl(store: &mut ProfileStore, options: &ReorderOptions) -> Result<(), WebError> {
    let slot = parse_slot(options.slot)?;
    let kind = parse_section(&options.section)?;
    store.reorder_profile(slot, kind, options.from, options.to)?;
    Ok(())
}

fn sort_targeting_impl(store: &mut ProfileStore, options: &SortOptions) -> Result<usize, WebError> {
    let slot = parse_slot(options.slot)?;
    match options.index {
        Some(index) => {
            store.sort_profile_targets(slot, index)?;
            Ok(1)
        }
        None => Ok(store.sort_targeting_lists(slot)?),
    }
}

fn export_impl(store: &ProfileStore, slot: u8, options: &ExportOptions) -> Result<String, WebError> {
    let slot = parse_slot(slot)?;
    let indent = JsonIndent::from_width(options.indent).ok_or_else(|| {
        WebError::new(
            "invalid_options",
            format!("Invalid indent '{}'. Expected 2 or 4", options.indent),
        )
    })?;
    let document = loaded_document(store, slot)?;
    debug!("exporting {slot} with {indent:?} indent");
    render_document(document, indent).map_err(|err| {
        WebError::new(
            "render_failed",
            format!("failed to serialize document: {err}"),
        )
    })
}

fn loaded_document(
    store: &ProfileStore,
    slot: Slot,
) -> Result<&zerobot_core::document::Document, WebError> {
    store.document(slot).ok_or_else(|| {
        WebError::new(
            "document_not_loaded",
            format!("no document is loaded in {slot}"),
        )
    })
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, WebError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| WebError::new("render_failed", format!("failed to convert result: {err}")))
}

fn parse_options<T>(options: JsValue) -> Result<T, WebError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if options.is_null() || options.is_undefined() {
        return Ok(T::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse editor options: {err}"),
        )
    })
}

fn parse_slot(raw: u8) -> Result<Slot, WebError> {
    Slot::from_index(usize::from(raw)).ok_or_else(|| {
        WebError::new(
            "invalid_options",
            format!("Invalid slot '{raw}'. Expected 0 or 1"),
        )
    })
}

fn parse_section(raw: &str) -> Result<SectionKind, WebError> {
    SectionKind::parse_user_input(raw).ok_or_else(|| {
        WebError::new(
            "invalid_options",
            format!(
                "Invalid section '{raw}'. Expected one of: targeting, magicShooter, equipment, healing"
            ),
        )
    })
}
