//! Classification of entries found in an export tree.

use crate::config::LayoutConfig;

/// What an export-tree entry represents, decided from its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// An exported message folder.
    Message,
    /// A calendar/meeting item. Always skipped.
    Meeting,
    /// An ordinary folder to recurse into.
    Folder,
}

impl EntryKind {
    /// Classify an entry by its name.
    ///
    /// The message prefix is checked before the meeting prefix, so a
    /// configuration where one prefix extends the other still resolves
    /// deterministically.
    pub fn classify(name: &str, layout: &LayoutConfig) -> Self {
        if name.starts_with(&layout.message_prefix) {
            Self::Message
        } else if name.starts_with(&layout.meeting_prefix) {
            Self::Meeting
        } else {
            Self::Folder
        }
    }
}
