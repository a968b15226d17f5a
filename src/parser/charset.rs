//! Charset sniffing for exported HTML bodies.

use std::sync::LazyLock;

use regex::bytes::Regex;

/// `charset=utf-8` in any case, with optional whitespace before `=`,
/// an optional quote before the value and an optional hyphen.
static UTF8_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)charset\s*=["']?utf-?8"#).expect("valid regex")
});

/// Whether the first `sniff_len` bytes of `html` declare a UTF-8 charset.
///
/// A declaration that only appears after the sniffed prefix does not count.
pub fn declares_utf8(html: &[u8], sniff_len: usize) -> bool {
    let prefix = &html[..html.len().min(sniff_len)];
    UTF8_DECLARATION.is_match(prefix)
}
