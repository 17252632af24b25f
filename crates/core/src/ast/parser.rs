use tree_sitter::{Language, Parser, Tree};

use crate::error::ParseError;

/// Parse Solidity source into a tree-sitter syntax tree.
/// Malformed input still produces a tree with `ERROR` nodes.
pub fn parse_source(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    let language: Language = tree_sitter_solidity::LANGUAGE.into();
    parser
        .set_language(&language)
        .map_err(|e| ParseError::Language(e.to_string()))?;
    parser.parse(source, None).ok_or(ParseError::NoTree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_solidity() {
        let tree = parse_source("pragma solidity ^0.8.0;\ncontract A {}").unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_parse_invalid_solidity_recovers() {
        let tree = parse_source("contract A { function ( }").unwrap();
        assert!(tree.root_node().has_error());
    }

    #[test]
    fn test_parse_empty_source() {
        let tree = parse_source("").unwrap();
        assert_eq!(tree.root_node().named_child_count(), 0);
    }
}
