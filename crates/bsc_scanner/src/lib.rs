//! bsc_scanner: Lexer for BrightScript and BrighterScript source code.
//!
//! Converts source text into the token list the parser consumes:
//! - case-insensitive keywords, with `end if`, `exit while` and friends
//!   combined into single tokens
//! - `'` and `rem` comments as Comment tokens
//! - significant Newline tokens
//! - string and numeric literals with their values

mod char_codes;
mod scanner;

pub use scanner::{Lexer, ScanResult};
