use log::{debug, info};

use crate::document::Document;
use crate::kind::SectionKind;
use crate::profile::{Profile, fallback_name};
use crate::section::ProfileSection;

use super::error::{CoreError, CoreErrorCode};
use super::types::{
    ClipboardEntry, DocumentSummary, DragSource, DropOutcome, DropTarget, SectionSummary, Slot,
};

/// Editing session state: two document slots and a one-entry clipboard.
///
/// Every mutating operation parses the affected section out of its document,
/// edits the detached copy and writes it back only on success, so a failed
/// call never leaves a half-applied change behind.
#[derive(Debug, Default, Clone)]
pub struct ProfileStore {
    documents: [Option<Document>; 2],
    clipboard: Option<ClipboardEntry>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_bytes<B: AsRef<[u8]>>(&mut self, slot: Slot, bytes: B) -> Result<(), CoreError> {
        let document = Document::parse(bytes).map_err(|e| {
            CoreError::new(e.code, format!("failed to load {slot}: {}", e.message))
        })?;
        self.insert_document(slot, document);
        Ok(())
    }

    pub fn insert_document(&mut self, slot: Slot, document: Document) {
        info!(
            "loaded {slot} with sections {:?}",
            document.present_sections()
        );
        self.documents[slot.index()] = Some(document);
    }

    /// Empties a slot. A clipboard copied from that slot is dropped too.
    pub fn remove_document(&mut self, slot: Slot) -> Option<Document> {
        if self.clipboard.as_ref().is_some_and(|c| c.slot == slot) {
            self.clipboard = None;
        }
        let removed = self.documents[slot.index()].take();
        if removed.is_some() {
            info!("removed {slot}");
        }
        removed
    }

    pub fn reset(&mut self) {
        self.documents = [None, None];
        self.clipboard = None;
    }

    pub fn document(&self, slot: Slot) -> Option<&Document> {
        self.documents[slot.index()].as_ref()
    }

    pub fn is_loaded(&self, slot: Slot) -> bool {
        self.document(slot).is_some()
    }

    pub fn loaded_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_some()).count()
    }

    pub fn clipboard(&self) -> Option<&ClipboardEntry> {
        self.clipboard.as_ref()
    }

    pub fn section_summary(
        &self,
        slot: Slot,
        kind: SectionKind,
    ) -> Result<Option<SectionSummary>, CoreError> {
        Ok(self
            .loaded(slot)?
            .section(kind)
            .map(|section| SectionSummary::of(&section)))
    }

    pub fn document_summary(&self, slot: Slot) -> Result<DocumentSummary, CoreError> {
        let document = self.loaded(slot)?;
        Ok(DocumentSummary {
            slot,
            sections: SectionKind::ALL
                .into_iter()
                .filter_map(|kind| document.section(kind))
                .map(|section| SectionSummary::of(&section))
                .collect(),
            enabled_scripts: document.enabled_scripts(),
        })
    }

    /// Appends a deep copy of one profile to the same section of `target`,
    /// creating that section if needed. Returns the name it was stored under.
    pub fn copy_profile(
        &mut self,
        source: Slot,
        target: Slot,
        kind: SectionKind,
        index: usize,
    ) -> Result<String, CoreError> {
        let source_section = self.existing_section(source, kind)?;
        let profile = source_section.profile(index)?.clone();
        let mut target_section = self.loaded(target)?.section_or_empty(kind);

        let candidate = copy_candidate(&profile, &target_section);
        let final_name = target_section.insert_profile(Profile {
            name: candidate,
            ..profile
        })?;

        self.loaded_mut(target)?.put_section(&target_section);
        debug!("copied {kind} profile {index} from {source} to {target} as \"{final_name}\"");
        Ok(final_name)
    }

    /// Resolves a drag-and-drop gesture. Drops inside the dragged profile's
    /// own list reorder it; drops anywhere else copy it.
    pub fn drop_profile(
        &mut self,
        source: DragSource,
        target: DropTarget,
    ) -> Result<DropOutcome, CoreError> {
        if target.slot() != source.slot || target.kind() != source.kind {
            let final_name =
                self.copy_profile(source.slot, target.slot(), source.kind, source.index)?;
            return Ok(DropOutcome::Copied {
                slot: target.slot(),
                final_name,
            });
        }

        let to = match target {
            DropTarget::Profile { index, .. } => index,
            DropTarget::List { .. } => self
                .existing_section(source.slot, source.kind)?
                .effective_count()
                .saturating_sub(1),
        };
        if to == source.index {
            return Ok(DropOutcome::Unchanged);
        }

        self.reorder_profile(source.slot, source.kind, source.index, to)?;
        Ok(DropOutcome::Reordered {
            from: source.index,
            to,
        })
    }

    /// Overwrites the target's section with a verbatim copy of the source's.
    pub fn replace_section(
        &mut self,
        source: Slot,
        target: Slot,
        kind: SectionKind,
    ) -> Result<(), CoreError> {
        let raw = self
            .loaded(source)?
            .raw_section(kind)
            .cloned()
            .ok_or_else(|| section_not_found(source, kind))?;

        self.loaded_mut(target)?.set_raw_section(kind, raw);
        debug!("replaced {kind} section of {target} with the one from {source}");
        Ok(())
    }

    /// Appends every source profile to the target section. Either all of
    /// them fit or nothing is changed.
    pub fn merge_section(
        &mut self,
        source: Slot,
        target: Slot,
        kind: SectionKind,
    ) -> Result<usize, CoreError> {
        let source_section = self.existing_section(source, kind)?;
        let mut target_section = self.loaded(target)?.section_or_empty(kind);
        target_section.ensure_room_for(source_section.effective_count())?;

        for profile in source_section.profiles() {
            let candidate = copy_candidate(profile, &target_section);
            target_section.insert_profile(Profile {
                name: candidate,
                ..profile.clone()
            })?;
        }

        self.loaded_mut(target)?.put_section(&target_section);
        let appended = source_section.effective_count();
        debug!("merged {appended} {kind} profiles from {source} into {target}");
        Ok(appended)
    }

    pub fn copy_to_clipboard(
        &mut self,
        slot: Slot,
        kind: SectionKind,
        index: usize,
    ) -> Result<(), CoreError> {
        let payload = self
            .existing_section(slot, kind)?
            .profile(index)?
            .payload
            .clone();

        self.clipboard = Some(ClipboardEntry {
            kind,
            slot,
            profile_index: index,
            payload,
        });
        debug!("copied {kind} profile {index} of {slot} to the clipboard");
        Ok(())
    }

    /// Overwrites one profile's payload with the clipboard content. The
    /// clipboard is kept, so the same payload can be pasted repeatedly.
    pub fn paste_from_clipboard(
        &mut self,
        slot: Slot,
        kind: SectionKind,
        index: usize,
    ) -> Result<(), CoreError> {
        let Some(clipboard) = self.clipboard.as_ref() else {
            return Err(CoreError::new(
                CoreErrorCode::ClipboardEmpty,
                "nothing has been copied yet",
            ));
        };
        if clipboard.kind != kind {
            return Err(CoreError::new(
                CoreErrorCode::SectionMismatch,
                format!(
                    "clipboard holds a {} profile and cannot be pasted into {kind}",
                    clipboard.kind
                ),
            ));
        }

        let payload = clipboard.payload.clone();
        self.edit_section(slot, kind, |section| section.replace_payload(index, payload))?;
        debug!("pasted clipboard into {kind} profile {index} of {slot}");
        Ok(())
    }

    pub fn rename_profile(
        &mut self,
        slot: Slot,
        kind: SectionKind,
        index: usize,
        new_name: &str,
    ) -> Result<(), CoreError> {
        self.edit_section(slot, kind, |section| section.rename_profile(index, new_name))
    }

    pub fn delete_profile(
        &mut self,
        slot: Slot,
        kind: SectionKind,
        index: usize,
    ) -> Result<String, CoreError> {
        let removed = self.edit_section(slot, kind, |section| section.delete_profile(index))?;
        debug!("deleted {kind} profile \"{removed}\" from {slot}");
        Ok(removed)
    }

    pub fn reorder_profile(
        &mut self,
        slot: Slot,
        kind: SectionKind,
        from: usize,
        to: usize,
    ) -> Result<(), CoreError> {
        self.edit_section(slot, kind, |section| section.reorder_profile(from, to))
    }

    pub fn sort_profile_targets(&mut self, slot: Slot, index: usize) -> Result<(), CoreError> {
        self.edit_section(slot, SectionKind::Targeting, |section| {
            section.sort_by_payload_name(index)
        })
    }

    /// Sorts the monster list of every targeting profile.
    pub fn sort_targeting_lists(&mut self, slot: Slot) -> Result<usize, CoreError> {
        self.edit_section(slot, SectionKind::Targeting, |section| {
            section.sort_all_payloads_by_name()
        })
    }

    pub fn enabled_scripts(&self, slot: Slot) -> Result<Vec<String>, CoreError> {
        Ok(self.loaded(slot)?.enabled_scripts())
    }

    pub fn sort_enabled_scripts(&mut self, slot: Slot) -> Result<bool, CoreError> {
        Ok(self.loaded_mut(slot)?.sort_enabled_scripts())
    }

    fn loaded(&self, slot: Slot) -> Result<&Document, CoreError> {
        self.documents[slot.index()]
            .as_ref()
            .ok_or_else(|| not_loaded(slot))
    }

    fn loaded_mut(&mut self, slot: Slot) -> Result<&mut Document, CoreError> {
        self.documents[slot.index()]
            .as_mut()
            .ok_or_else(|| not_loaded(slot))
    }

    fn existing_section(&self, slot: Slot, kind: SectionKind) -> Result<ProfileSection, CoreError> {
        self.loaded(slot)?
            .section(kind)
            .ok_or_else(|| section_not_found(slot, kind))
    }

    fn edit_section<T>(
        &mut self,
        slot: Slot,
        kind: SectionKind,
        edit: impl FnOnce(&mut ProfileSection) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut section = self.existing_section(slot, kind)?;
        let out = edit(&mut section)?;
        self.loaded_mut(slot)?.put_section(&section);
        Ok(out)
    }
}

fn copy_candidate(profile: &Profile, target: &ProfileSection) -> String {
    fallback_name(&profile.name, target.effective_count())
}

fn not_loaded(slot: Slot) -> CoreError {
    CoreError::new(
        CoreErrorCode::DocumentNotLoaded,
        format!("no document is loaded in {slot}"),
    )
}

fn section_not_found(slot: Slot, kind: SectionKind) -> CoreError {
    CoreError::new(
        CoreErrorCode::SectionNotFound,
        format!("{slot} has no {kind} section"),
    )
}
