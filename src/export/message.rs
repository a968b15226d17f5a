//! Assemble one exported message folder into a composite document.
//!
//! A message folder looks like:
//!
//! ```text
//! Message00042/
//!     InternetHeaders.txt
//!     Message.html          (optional)
//!     Message.txt           (optional, ignored when Message.html exists)
//!     Attachments/          (optional)
//!         report.pdf
//!         1_Forwarded/
//!             Message00001/ (nested message, same layout)
//! ```
//!
//! Nothing is written to disk here; see [`super::tree`] for that.

use std::path::Path;

use tracing::debug;

use crate::config::{Config, LayoutConfig};
use crate::error::{ConvertError, Result};
use crate::model::document::{Document, Part};
use crate::model::entry::EntryKind;
use crate::parser::{charset, headers};

use super::{file_name, read, read_dir};

/// Builds [`Document`]s from exported message folders.
#[derive(Debug, Clone)]
pub struct Assembler<'a> {
    layout: &'a LayoutConfig,
    charset_sniff_len: usize,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            layout: &config.layout,
            charset_sniff_len: config.output.charset_sniff_len,
        }
    }

    /// Assemble `folder` and serialize the result.
    pub fn assemble(&self, folder: &Path) -> Result<Vec<u8>> {
        Ok(self.build(folder)?.to_bytes())
    }

    /// Build the document for `folder`.
    ///
    /// The header resource must exist; a missing one surfaces as an I/O error.
    /// Fails with [`ConvertError::Structural`] when an attachment subfolder
    /// holds anything but messages.
    pub fn build(&self, folder: &Path) -> Result<Document> {
        let headers_path = folder.join(&self.layout.headers_file);
        let raw = read(&headers_path)?;

        let mut parts = Vec::new();
        if let Some(body) = self.body_part(folder)? {
            parts.push(body);
        }
        self.attachment_parts(folder, &mut parts)?;

        Ok(Document {
            headers: headers::envelope_fields(&raw),
            parts,
        })
    }

    /// HTML body if present, else plain text if present, else nothing.
    fn body_part(&self, folder: &Path) -> Result<Option<Part>> {
        let html_path = folder.join(&self.layout.html_file);
        if html_path.is_file() {
            let html = read(&html_path)?;
            let utf8 = charset::declares_utf8(&html, self.charset_sniff_len);
            debug!(path = %html_path.display(), utf8, "HTML body");
            return Ok(Some(Part::html(html, utf8)));
        }

        let text_path = folder.join(&self.layout.text_file);
        if text_path.is_file() {
            debug!(path = %text_path.display(), "Plain-text body");
            return Ok(Some(Part::text(read(&text_path)?)));
        }

        Ok(None)
    }

    /// Append one part per attachment, in directory enumeration order.
    fn attachment_parts(&self, folder: &Path, parts: &mut Vec<Part>) -> Result<()> {
        let dir = folder.join(&self.layout.attachments_dir);
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in read_dir(&dir)? {
            let path = entry.path();
            if path.is_dir() {
                for child in read_dir(&path)? {
                    let child_path = child.path();
                    let name = file_name(&child_path);
                    if EntryKind::classify(&name, self.layout) != EntryKind::Message {
                        return Err(ConvertError::Structural { path: child_path });
                    }
                    debug!(path = %child_path.display(), "Nested message attachment");
                    let nested = self.assemble(&child_path)?;
                    parts.push(Part::message(name, nested));
                }
            } else {
                debug!(path = %path.display(), "File attachment");
                parts.push(Part::file(file_name(&path), read(&path)?));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::PartType;

    fn write(path: &Path, contents: &[u8]) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    fn message(dir: &Path, subject: &str) {
        write(
            &dir.join("InternetHeaders.txt"),
            format!("From: a@b.com\r\nSubject: {subject}\r\nContent-Type: text/plain\r\n\r\n").as_bytes(),
        );
    }

    #[test]
    fn test_headers_only() {
        let tmp = tempfile::tempdir().unwrap();
        let msg = tmp.path().join("Message1");
        message(&msg, "Hi");

        let config = Config::default();
        let doc = Assembler::new(&config).build(&msg).unwrap();
        assert!(doc.header("subject").is_some());
        assert!(doc.header("content-type").is_none());
        assert!(doc.parts.is_empty());
    }

    #[test]
    fn test_html_preferred_over_text() {
        let tmp = tempfile::tempdir().unwrap();
        let msg = tmp.path().join("Message1");
        message(&msg, "Hi");
        write(&msg.join("Message.html"), b"<p>html</p>");
        write(&msg.join("Message.txt"), b"text");

        let config = Config::default();
        let doc = Assembler::new(&config).build(&msg).unwrap();
        assert_eq!(doc.parts.len(), 1);
        let body = doc.body().unwrap();
        assert_eq!(body.part_type, PartType::Html { utf8: false });
        assert_eq!(body.body, b"<p>html</p>");
    }

    #[test]
    fn test_text_body_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        let msg = tmp.path().join("Message1");
        message(&msg, "Hi");
        write(&msg.join("Message.txt"), b"text");

        let config = Config::default();
        let doc = Assembler::new(&config).build(&msg).unwrap();
        assert_eq!(doc.body().unwrap().part_type, PartType::Text);
    }

    #[test]
    fn test_utf8_html_is_declared() {
        let tmp = tempfile::tempdir().unwrap();
        let msg = tmp.path().join("Message1");
        message(&msg, "Hi");
        write(&msg.join("Message.html"), br#"<meta charset="UTF-8"><p>ok</p>"#);

        let config = Config::default();
        let doc = Assembler::new(&config).build(&msg).unwrap();
        assert_eq!(doc.body().unwrap().part_type, PartType::Html { utf8: true });
    }

    #[test]
    fn test_file_and_nested_attachments() {
        let tmp = tempfile::tempdir().unwrap();
        let msg = tmp.path().join("Message1");
        message(&msg, "Outer");
        write(&msg.join("Attachments").join("data.bin"), &[0, 1, 2, 255]);
        message(&msg.join("Attachments").join("Sub").join("Message2"), "Inner");

        let config = Config::default();
        let doc = Assembler::new(&config).build(&msg).unwrap();
        assert!(doc.body().is_none());

        let mut attachments: Vec<&Part> = doc.attachments().collect();
        attachments.sort_by_key(|p| p.filename.clone());
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].filename.as_deref(), Some("Message2"));
        assert_eq!(attachments[0].part_type, PartType::Rfc822);
        assert!(String::from_utf8_lossy(&attachments[0].body).contains("Subject: Inner"));
        assert_eq!(attachments[1].filename.as_deref(), Some("data.bin"));
        assert_eq!(attachments[1].body, [0, 1, 2, 255]);
    }

    #[test]
    fn test_non_message_in_attachment_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let msg = tmp.path().join("Message1");
        message(&msg, "Outer");
        write(&msg.join("Attachments").join("Sub").join("stray.txt"), b"?");

        let config = Config::default();
        let err = Assembler::new(&config).build(&msg).unwrap_err();
        assert!(err.is_structural(), "unexpected error: {err}");
    }

    #[test]
    fn test_missing_headers_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::default();
        let err = Assembler::new(&config).build(tmp.path()).unwrap_err();
        match err {
            ConvertError::Io { path, .. } => {
                assert_eq!(path, tmp.path().join("InternetHeaders.txt"));
            }
            other => panic!("expected I/O error, got {other}"),
        }
    }
}
