//! bsc_ast: Token and syntax tree definitions for BrightScript and BrighterScript.
//!
//! This module defines the token kinds, the token type shared by the scanner
//! and parser, every statement and expression node, the reserved-word table,
//! and a visitor for walking the tree.

pub mod generated;
pub mod node;
pub mod reserved;
pub mod syntax_kind;
pub mod token;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use reserved::is_reserved_word;
pub use syntax_kind::SyntaxKind;
pub use token::{LiteralValue, Token};
