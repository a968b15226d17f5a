//! The composite document assembled for one exported message.
//!
//! A [`Document`] is built once from its inputs and never mutated afterwards;
//! serialization lives in [`crate::export::mime`].

/// One raw header field, kept byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Lowercased field name, used only for matching.
    pub name: String,
    /// The full field as it appeared in the source, continuation lines
    /// included, without the final line ending. Continuation lines are
    /// joined with CRLF.
    pub raw: Vec<u8>,
}

/// MIME type of a part, together with its optional charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartType {
    /// `text/html`, optionally declared as UTF-8.
    Html { utf8: bool },
    /// `text/plain` without a declared charset.
    Text,
    /// An opaque file attachment.
    OctetStream,
    /// A nested composite document.
    Rfc822,
}

impl PartType {
    /// The `type/subtype` string.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Html { .. } => "text/html",
            Self::Text => "text/plain",
            Self::OctetStream => "application/octet-stream",
            Self::Rfc822 => "message/rfc822",
        }
    }

    /// Charset parameter, if one is declared.
    pub fn charset(self) -> Option<&'static str> {
        match self {
            Self::Html { utf8: true } => Some("utf-8"),
            _ => None,
        }
    }
}

/// A single body or attachment part. The body is always base64-encoded
/// on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub part_type: PartType,
    /// Attachment filename; `None` for body parts, which carry no disposition.
    pub filename: Option<String>,
    pub body: Vec<u8>,
}

impl Part {
    pub fn html(body: Vec<u8>, utf8: bool) -> Self {
        Self {
            part_type: PartType::Html { utf8 },
            filename: None,
            body,
        }
    }

    pub fn text(body: Vec<u8>) -> Self {
        Self {
            part_type: PartType::Text,
            filename: None,
            body,
        }
    }

    /// A plain file attachment.
    pub fn file(filename: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            part_type: PartType::OctetStream,
            filename: Some(filename.into()),
            body,
        }
    }

    /// A nested message attachment holding an already serialized document.
    pub fn message(filename: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            part_type: PartType::Rfc822,
            filename: Some(filename.into()),
            body,
        }
    }

    /// `true` for parts sent with `Content-Disposition: attachment`.
    pub fn is_attachment(&self) -> bool {
        self.filename.is_some()
    }
}

/// Headers plus ordered parts of one message, ready to serialize.
///
/// `headers` never contains `Content-Type` or `Content-Transfer-Encoding`;
/// the container type is written by the serializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub headers: Vec<HeaderField>,
    pub parts: Vec<Part>,
}

impl Document {
    /// Look up the first header with the given (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&HeaderField> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().find(|h| h.name == name)
    }

    /// The body part, if any. At most one exists and it always comes first.
    pub fn body(&self) -> Option<&Part> {
        self.parts.first().filter(|p| !p.is_attachment())
    }

    /// Attachment parts in encounter order.
    pub fn attachments(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|p| p.is_attachment())
    }
}
