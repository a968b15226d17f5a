//! Splitting a raw header block into fields.
//!
//! `InternetHeaders.txt` holds the message's transport headers as exported.
//! Fields are kept as raw bytes so that encoded words, odd charsets and
//! folding survive untouched; only the field name is decoded for matching.

use tracing::debug;

use crate::model::document::HeaderField;

/// Headers that describe the original body and are replaced on output.
const BODY_COUPLED: &[&str] = &["content-type", "content-transfer-encoding"];

/// Split raw header bytes into fields.
///
/// Everything after the first blank line is treated as body and ignored.
/// Lines that are neither a continuation nor a `name: value` field (for
/// example an mbox `From ` separator) are dropped.
pub fn split_fields(raw: &[u8]) -> Vec<HeaderField> {
    let raw = strip_bom(raw);
    let start = raw
        .iter()
        .position(|&b| b != b'\r' && b != b'\n')
        .unwrap_or(raw.len());
    let raw = &raw[start..];

    let mut fields: Vec<HeaderField> = Vec::new();
    for line in raw.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        // First blank line ends the header block, whatever its line ending.
        if line.is_empty() {
            break;
        }
        if line[0] == b' ' || line[0] == b'\t' {
            match fields.last_mut() {
                Some(last) => {
                    last.raw.extend_from_slice(b"\r\n");
                    last.raw.extend_from_slice(line);
                }
                None => debug!("Dropping continuation line before first header"),
            }
        } else if let Some(colon) = line.iter().position(|&b| b == b':') {
            let name = String::from_utf8_lossy(&line[..colon])
                .trim()
                .to_ascii_lowercase();
            fields.push(HeaderField {
                name,
                raw: line.to_vec(),
            });
        } else {
            debug!(
                line = %String::from_utf8_lossy(line),
                "Dropping malformed header line"
            );
        }
    }
    fields
}

/// Split raw header bytes and drop the fields describing the original body.
pub fn envelope_fields(raw: &[u8]) -> Vec<HeaderField> {
    split_fields(raw)
        .into_iter()
        .filter(|f| !BODY_COUPLED.contains(&f.name.as_str()))
        .collect()
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes)
}
