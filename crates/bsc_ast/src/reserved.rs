//! Reserved words.
//!
//! These may never be assigned to or used as a local identifier, but remain
//! legal as associative array keys and after a `.`.

use lazy_static::lazy_static;
use rustc_hash::FxHashSet;

lazy_static! {
    pub static ref RESERVED_WORDS: FxHashSet<&'static str> = [
        "and", "dim", "each", "else", "elseif", "end", "endfunction", "endif",
        "endsub", "endwhile", "eval", "exit", "exitwhile", "false", "for",
        "function", "goto", "if", "invalid", "let", "line_num", "next", "not",
        "objfun", "or", "pos", "print", "rem", "return", "step", "stop", "sub",
        "tab", "then", "to", "true", "type", "while",
    ]
    .into_iter()
    .collect();
}

/// Case-insensitive reserved word check.
pub fn is_reserved_word(text: &str) -> bool {
    RESERVED_WORDS.contains(text.to_ascii_lowercase().as_str())
}
