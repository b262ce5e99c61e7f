//! Structural source parsers using tree-sitter
//!
//! A parser turns one source unit into a [`SymbolModel`]: its definitions
//! (with documentation presence) and an import tally. Code is never
//! evaluated, only its syntax tree is inspected.

pub mod python;

use crate::error::ParseError;
use crate::models::SymbolModel;

/// Parse a source unit according to its file extension.
///
/// Extensions without a parser produce an empty model.
pub fn parse_unit(extension: &str, source: &str) -> Result<SymbolModel, ParseError> {
    match extension {
        "py" | "pyi" => python::parse_source(source),
        _ => Ok(SymbolModel::default()),
    }
}

/// Extensions with a structural parser, accepted as `sources.extension`
pub fn supported_extensions() -> &'static [&'static str] {
    &["py", "pyi"]
}
