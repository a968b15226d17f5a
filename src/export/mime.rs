//! Serialization of a [`Document`] to RFC 5322 / MIME bytes.
//!
//! The output is a `multipart/mixed` container whose parts are all
//! base64-encoded. The boundary is derived from a digest of the content,
//! so the same document always serializes to the same bytes.

use std::io::{self, Write};

use base64::Engine;
use sha2::{Digest, Sha256};

use crate::model::document::{Document, Part};

/// Maximum length of a base64 line, excluding CRLF.
const BASE64_LINE_LEN: usize = 76;

impl Document {
    /// Serialize the document into a new buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.estimated_len());
        write_document(self, &mut out).expect("writing to a Vec cannot fail");
        out
    }

    fn estimated_len(&self) -> usize {
        let headers: usize = self.headers.iter().map(|h| h.raw.len() + 2).sum();
        let parts: usize = self.parts.iter().map(|p| p.body.len() * 4 / 3 + 256).sum();
        headers + parts + 256
    }
}

/// Write `doc` as a `multipart/mixed` message.
fn write_document<W: Write>(doc: &Document, out: &mut W) -> io::Result<()> {
    let boundary = boundary_for(doc);

    for field in &doc.headers {
        out.write_all(&field.raw)?;
        out.write_all(b"\r\n")?;
    }
    if doc.header("mime-version").is_none() {
        out.write_all(b"MIME-Version: 1.0\r\n")?;
    }
    write!(
        out,
        "Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n\r\n"
    )?;

    for part in &doc.parts {
        write!(out, "--{boundary}\r\n")?;
        write_part(part, out)?;
    }
    write!(out, "--{boundary}--\r\n")?;
    Ok(())
}

fn write_part<W: Write>(part: &Part, out: &mut W) -> io::Result<()> {
    let ty = part.part_type;
    match ty.charset() {
        Some(charset) => write!(
            out,
            "Content-Type: {}; charset=\"{charset}\"\r\n",
            ty.mime_type()
        )?,
        None => write!(out, "Content-Type: {}\r\n", ty.mime_type())?,
    }
    out.write_all(b"Content-Transfer-Encoding: base64\r\n")?;
    if let Some(ref filename) = part.filename {
        write!(
            out,
            "Content-Disposition: attachment; {}\r\n",
            filename_param(filename)
        )?;
    }
    out.write_all(b"\r\n")?;
    write_base64(&part.body, out)
}

/// Write `data` as base64, wrapped at [`BASE64_LINE_LEN`] columns.
fn write_base64<W: Write>(data: &[u8], out: &mut W) -> io::Result<()> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    for line in encoded.as_bytes().chunks(BASE64_LINE_LEN) {
        out.write_all(line)?;
        out.write_all(b"\r\n")?;
    }
    Ok(())
}

/// Derive a boundary from the document content.
///
/// Base64 lines never start with `-`, so the only place a collision could
/// come from is the header block, which is hashed as well.
fn boundary_for(doc: &Document) -> String {
    let mut hasher = Sha256::new();
    for field in &doc.headers {
        hasher.update(&field.raw);
        hasher.update(b"\n");
    }
    for part in &doc.parts {
        hasher.update(part.part_type.mime_type().as_bytes());
        hasher.update((part.body.len() as u64).to_le_bytes());
        hasher.update(&part.body);
        if let Some(ref filename) = part.filename {
            hasher.update(filename.as_bytes());
        }
    }
    let digest = format!("{:x}", hasher.finalize());
    format!("=_pff2eml_{}", &digest[..32])
}

/// Render the `filename` disposition parameter.
///
/// ASCII names are quoted; anything else uses the RFC 2231 extended form.
fn filename_param(filename: &str) -> String {
    if filename.bytes().all(|b| (0x20..0x7F).contains(&b)) {
        let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
        format!("filename=\"{escaped}\"")
    } else {
        format!("filename*=utf-8''{}", percent_encode(filename))
    }
}

/// Percent-encode everything outside the RFC 2231 `attribute-char` set.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
