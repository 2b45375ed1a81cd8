//! bsc_parser: BrightScript and BrighterScript parser.
//!
//! Turns the scanner's token stream into an arena-allocated syntax tree.
//! The parser never aborts: problems are reported as diagnostics and the
//! tree for everything that could be recovered is always returned.

mod parser;
mod precedence;

pub use parser::{ParseMode, ParseOptions, ParseResult, Parser};
