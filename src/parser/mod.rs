//! Input parsing: raw header blocks and HTML charset sniffing.

pub mod charset;
pub mod headers;
