//! Conversion of exported message folders into `.eml` files.

use std::path::Path;

use crate::error::{ConvertError, Result};

pub mod message;
pub mod mime;
pub mod tree;

pub use message::Assembler;
pub use tree::{Converter, Outcome, Skip, Summary};

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| ConvertError::io(path, e))
}

/// Collect the entries of `dir`, failing on the first unreadable one.
fn read_dir(dir: &Path) -> Result<Vec<std::fs::DirEntry>> {
    std::fs::read_dir(dir)
        .and_then(|entries| entries.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| ConvertError::io(dir, e))
}

/// Base name of `path` as a (lossily decoded) string.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
