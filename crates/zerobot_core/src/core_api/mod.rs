mod error;
pub mod host;
mod store;
mod types;

pub use error::{CoreError, CoreErrorCode};
pub use host::{EditorHost, NoticeKind};
pub use store::ProfileStore;
pub use types::{
    ClipboardEntry, DocumentSummary, DragSource, DropOutcome, DropTarget, ProfileSummary,
    SectionSummary, Slot,
};
