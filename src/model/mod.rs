//! Core data model types: export-tree entries and composite documents.

pub mod document;
pub mod entry;
