//! Character classification used by the scanner.

use unicode_xid::UnicodeXID;

pub const DOUBLE_QUOTE: u8 = b'"';
pub const LINE_FEED: u8 = b'\n';

#[inline]
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\u{feff}' | '\u{a0}')
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic() || (!ch.is_ascii() && UnicodeXID::is_xid_start(ch))
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric() || (!ch.is_ascii() && UnicodeXID::is_xid_continue(ch))
}

/// Trailing identifier characters that declare the variable's type,
/// e.g. `name$` or `count%`.
#[inline]
pub fn is_type_designator(ch: char) -> bool {
    matches!(ch, '$' | '%' | '!' | '#' | '&')
}

/// Number of UTF-16 code units, which is how editors count columns.
#[inline]
pub fn utf16_len(text: &str) -> u32 {
    text.chars().map(|c| c.len_utf16() as u32).sum()
}
