use tree_sitter::Node;

use super::source_unit::SourceSpan;

/// Source text covered by a node
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Convert a tree-sitter node position to our SourceSpan
pub fn span_of(node: Node<'_>) -> SourceSpan {
    let start = node.start_position();
    let end = node.end_position();
    SourceSpan {
        start_line: start.row + 1,
        end_line: end.row + 1,
        start_col: start.column,
        end_col: end.column,
    }
}

/// Collect a node's direct children
pub fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Name of a declaration: the `name` field, falling back to the first identifier child
pub fn declaration_name(node: Node<'_>, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(node_text(name, source).to_string());
    }
    children(node)
        .into_iter()
        .find(|c| c.kind() == "identifier")
        .map(|c| node_text(c, source).to_string())
}

/// Remove all whitespace, e.g. `msg . sender` -> `msg.sender`
pub fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Leading identifier of an lvalue: `balances[msg.sender].amount` -> `balances`.
/// A leading `this.` is skipped. Returns an empty string for tuples.
pub fn root_identifier(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix("this.").unwrap_or(text);
    text.chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect()
}

/// Callee of a call expression text with call options removed:
/// `msg.sender.call{value: amount}("")` -> `msg.sender.call`,
/// `payable(owner).transfer(x)` -> `payable(owner).transfer`.
pub fn callee_of(call_text: &str) -> String {
    let text = call_text.trim_end();
    let without_args = strip_trailing_group(text, '(', ')');
    let without_options = strip_trailing_group(without_args.trim_end(), '{', '}');
    compact(without_options)
}

/// Strip a trailing balanced `open ... close` group, if present
fn strip_trailing_group(text: &str, open: char, close: char) -> &str {
    if !text.ends_with(close) {
        return text;
    }
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices().rev() {
        if ch == close {
            depth += 1;
        } else if ch == open {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return &text[..idx];
            }
        }
    }
    text
}

/// True when `word` occurs in `text` delimited by non-identifier characters
pub fn contains_word(text: &str, word: &str) -> bool {
    text.match_indices(word).any(|(idx, _)| {
        let before = text[..idx].chars().next_back();
        let after = text[idx + word.len()..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callee_of_strips_options_and_args() {
        assert_eq!(
            callee_of("msg.sender.call{value: amount}(\"\")"),
            "msg.sender.call"
        );
        assert_eq!(
            callee_of("payable(owner).transfer(address(this).balance)"),
            "payable(owner).transfer"
        );
        assert_eq!(callee_of("require(x > 0, \"zero\")"), "require");
    }

    #[test]
    fn test_root_identifier() {
        assert_eq!(root_identifier("balances[msg.sender]"), "balances");
        assert_eq!(root_identifier("this.owner"), "owner");
        assert_eq!(root_identifier("(a, b)"), "");
        assert_eq!(root_identifier("  total.value "), "total");
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("if (now > end)", "now"));
        assert!(!contains_word("uint known = 1;", "now"));
        assert!(contains_word("x = now;", "now"));
    }
}
