//! Walk an export tree and write one `.eml` file per message.
//!
//! The output mirrors the input hierarchy. Writes go to a temporary file in
//! the destination directory and are then renamed onto the final path, so a
//! final `.eml` file is never observed half-written. Existing outputs are
//! left alone, which makes an interrupted run safe to restart.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{file_name, read_dir, Assembler};
use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::model::entry::EntryKind;

/// Why an item produced no output. None of these stop the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The message folder has no header resource.
    MissingHeaders,
    /// The target file exists from a previous run.
    AlreadyConverted,
    /// A calendar/meeting item.
    Meeting,
}

/// Result of converting a single message folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Converted { path: PathBuf, bytes: u64 },
    Skipped(Skip),
}

/// Counters for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub converted: u64,
    pub bytes_written: u64,
    pub already_converted: u64,
    pub missing_headers: u64,
    pub meetings: u64,
}

impl Summary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Converted { bytes, .. } => {
                self.converted += 1;
                self.bytes_written += bytes;
            }
            Outcome::Skipped(Skip::AlreadyConverted) => self.already_converted += 1,
            Outcome::Skipped(Skip::MissingHeaders) => self.missing_headers += 1,
            Outcome::Skipped(Skip::Meeting) => self.meetings += 1,
        }
    }

    /// Total number of items that produced no output.
    pub fn skipped(&self) -> u64 {
        self.already_converted + self.missing_headers + self.meetings
    }
}

/// Converts export trees, mirroring them into an output directory.
pub struct Converter<'a> {
    config: &'a Config,
    assembler: Assembler<'a>,
    progress: Option<&'a dyn Fn(&Path)>,
}

impl<'a> Converter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            assembler: Assembler::new(config),
            progress: None,
        }
    }

    /// Call `progress` with each message folder before it is converted.
    pub fn with_progress(mut self, progress: &'a dyn Fn(&Path)) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Convert `item` (a message, a meeting, or a folder) into `destination`.
    ///
    /// A folder named `export` ends up as `destination/export/...`.
    /// Stops at the first structural or I/O error.
    pub fn convert(&self, item: &Path, destination: &Path) -> Result<Summary> {
        let mut summary = Summary::default();
        self.convert_item(item, destination, &mut summary)?;
        info!(
            converted = summary.converted,
            skipped = summary.skipped(),
            "Conversion finished"
        );
        Ok(summary)
    }

    fn convert_item(&self, item: &Path, destination: &Path, summary: &mut Summary) -> Result<()> {
        let name = file_name(item);
        if name.is_empty() {
            return Err(ConvertError::InvalidPath(item.display().to_string()));
        }

        match EntryKind::classify(&name, &self.config.layout) {
            EntryKind::Message => {
                let outcome = self.convert_message(item, destination)?;
                summary.record(&outcome);
            }
            EntryKind::Meeting => {
                warn!(path = %item.display(), "Skipping meeting");
                summary.record(&Outcome::Skipped(Skip::Meeting));
            }
            EntryKind::Folder if item.is_dir() => {
                self.convert_folder(item, &destination.join(&name), summary)?;
            }
            EntryKind::Folder => {
                debug!(path = %item.display(), "Ignoring stray file");
            }
        }
        Ok(())
    }

    fn convert_folder(&self, folder: &Path, destination: &Path, summary: &mut Summary) -> Result<()> {
        for entry in read_dir(folder)? {
            self.convert_item(&entry.path(), destination, summary)?;
        }
        Ok(())
    }

    /// Convert one message folder into `destination/<name>.eml`.
    pub fn convert_message(&self, message: &Path, destination: &Path) -> Result<Outcome> {
        if let Some(progress) = self.progress {
            progress(message);
        }
        info!(path = %message.display(), "Converting message");

        std::fs::create_dir_all(destination).map_err(|e| ConvertError::io(destination, e))?;

        let name = file_name(message);
        let target = destination.join(format!("{name}.{}", self.config.output.extension));
        if target.exists() {
            warn!(path = %target.display(), "Output exists, skipping");
            return Ok(Outcome::Skipped(Skip::AlreadyConverted));
        }
        if !message.join(&self.config.layout.headers_file).is_file() {
            warn!(path = %message.display(), "No internet headers, skipping");
            return Ok(Outcome::Skipped(Skip::MissingHeaders));
        }

        let bytes = self.assembler.assemble(message)?;
        if !write_atomic(destination, &name, &target, &bytes)? {
            warn!(path = %target.display(), "Output appeared during conversion, skipping");
            return Ok(Outcome::Skipped(Skip::AlreadyConverted));
        }

        Ok(Outcome::Converted {
            path: target,
            bytes: bytes.len() as u64,
        })
    }
}

/// Write `bytes` to a temp file in `dir`, then move it onto `target`.
///
/// Returns `false` without touching `target` if it already exists. The temp
/// file is removed on every error path.
fn write_atomic(dir: &Path, name: &str, target: &Path, bytes: &[u8]) -> Result<bool> {
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| ConvertError::io(dir, e))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| ConvertError::io(tmp.path(), e))?;

    match tmp.persist_noclobber(target) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ConvertError::io(target, e.error)),
    }
}
