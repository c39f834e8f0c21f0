use serde::{Deserialize, Serialize};

use crate::kind::SectionKind;

use super::error::{CoreError, CoreErrorCode};
use super::store::ProfileStore;
use super::types::{DragSource, DropOutcome, DropTarget, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// What the editor needs from whoever draws it: toasts, yes/no questions and
/// a single-line text prompt.
pub trait EditorHost {
    fn notify(&mut self, message: &str, kind: NoticeKind);

    fn confirm(&mut self, prompt: &str) -> bool;

    /// `None` means the user cancelled.
    fn prompt_text(&mut self, prompt: &str, default: &str) -> Option<String>;
}

/// Asks for a new name (pre-filled with the current one) and applies it.
/// Returns `Ok(None)` when the user cancels.
pub fn rename_with_prompt<H: EditorHost + ?Sized>(
    store: &mut ProfileStore,
    host: &mut H,
    slot: Slot,
    kind: SectionKind,
    index: usize,
) -> Result<Option<String>, CoreError> {
    let current = current_name(store, slot, kind, index)
        .inspect_err(|e| host.notify(&e.message, NoticeKind::Error))?;

    let Some(new_name) = host.prompt_text(&format!("New name for \"{current}\":"), &current) else {
        return Ok(None);
    };

    match store.rename_profile(slot, kind, index, &new_name) {
        Ok(()) => {
            let new_name = new_name.trim().to_string();
            host.notify(
                &format!("Profile \"{current}\" renamed to \"{new_name}\""),
                NoticeKind::Success,
            );
            Ok(Some(new_name))
        }
        Err(e) => {
            host.notify(&e.message, NoticeKind::Error);
            Err(e)
        }
    }
}

/// Deletes a profile after the user confirms. Returns the removed name, or
/// `Ok(None)` when the user declines.
pub fn delete_with_confirm<H: EditorHost + ?Sized>(
    store: &mut ProfileStore,
    host: &mut H,
    slot: Slot,
    kind: SectionKind,
    index: usize,
) -> Result<Option<String>, CoreError> {
    let current = current_name(store, slot, kind, index)
        .inspect_err(|e| host.notify(&e.message, NoticeKind::Error))?;

    if !host.confirm(&format!(
        "Are you sure you want to delete the profile \"{current}\"?"
    )) {
        return Ok(None);
    }

    match store.delete_profile(slot, kind, index) {
        Ok(removed) => {
            host.notify(
                &format!("Profile \"{current}\" deleted"),
                NoticeKind::Success,
            );
            Ok(Some(removed))
        }
        Err(e) => {
            host.notify(&e.message, NoticeKind::Error);
            Err(e)
        }
    }
}

pub fn copy_with_notice<H: EditorHost + ?Sized>(
    store: &mut ProfileStore,
    host: &mut H,
    source: Slot,
    target: Slot,
    kind: SectionKind,
    index: usize,
) -> Result<String, CoreError> {
    match store.copy_profile(source, target, kind, index) {
        Ok(final_name) => {
            host.notify(
                &format!("Profile \"{final_name}\" copied"),
                NoticeKind::Success,
            );
            Ok(final_name)
        }
        Err(e) => {
            host.notify(&e.message, NoticeKind::Error);
            Err(e)
        }
    }
}

pub fn drop_with_notice<H: EditorHost + ?Sized>(
    store: &mut ProfileStore,
    host: &mut H,
    source: DragSource,
    target: DropTarget,
) -> Result<DropOutcome, CoreError> {
    match store.drop_profile(source, target) {
        Ok(outcome) => {
            if let DropOutcome::Copied { final_name, .. } = &outcome {
                host.notify(
                    &format!("Profile \"{final_name}\" copied"),
                    NoticeKind::Success,
                );
            }
            Ok(outcome)
        }
        Err(e) => {
            host.notify(&e.message, NoticeKind::Error);
            Err(e)
        }
    }
}

fn current_name(
    store: &ProfileStore,
    slot: Slot,
    kind: SectionKind,
    index: usize,
) -> Result<String, CoreError> {
    let summary = store.section_summary(slot, kind)?.ok_or_else(|| {
        CoreError::new(
            CoreErrorCode::SectionNotFound,
            format!("{slot} has no {kind} section"),
        )
    })?;
    summary
        .profiles
        .get(index)
        .map(|p| p.display_name.clone())
        .ok_or_else(|| CoreError::index_out_of_range(index, summary.count()))
}
