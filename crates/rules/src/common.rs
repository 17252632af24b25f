use blockscope::ast::utils::compact;
use blockscope::ast::{ContractDef, FunctionBody, FunctionDef};
use blockscope::rule::AnalysisContext;

/// Modifier names that conventionally guard privileged functions
fn is_guard_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with("only")
        || ["auth", "role", "owner", "admin", "governance"]
            .iter()
            .any(|k| lower.contains(k))
}

/// True when the function is guarded by a modifier or checks `msg.sender` itself
pub fn has_access_control(contract: &ContractDef, function: &FunctionDef) -> bool {
    let guarded_by_modifier = function.modifiers.iter().any(|name| {
        is_guard_name(name)
            || contract
                .modifier(name)
                .and_then(|m| m.body.as_ref())
                .is_some_and(|b| checks_sender(&b.text))
    });
    guarded_by_modifier || function.body.as_ref().is_some_and(|b| checks_sender(&b.text))
}

/// `require` / `if` / `assert` conditions referencing `msg.sender`, or
/// OpenZeppelin-style owner/role checks
pub fn checks_sender(body: &str) -> bool {
    let code = compact(body);
    if ["_checkOwner(", "_checkRole(", "hasRole(", "_onlyOwner("]
        .iter()
        .any(|p| code.contains(p))
    {
        return true;
    }
    ["require(", "if(", "assert("].iter().any(|keyword| {
        code.match_indices(keyword).any(|(idx, _)| {
            condition_at(&code[idx + keyword.len()..]).contains("msg.sender")
        })
    })
}

/// Text up to the parenthesis closing an already-opened condition
fn condition_at(rest: &str) -> &str {
    let mut depth = 1usize;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..idx];
                }
            }
            _ => {}
        }
    }
    rest
}

/// Drop a trailing `//` comment
pub fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// (line number, code without comment) for every line of a function body
pub fn body_lines<'a>(
    ctx: &AnalysisContext<'a>,
    body: &FunctionBody,
) -> Vec<(usize, &'a str)> {
    (body.span.start_line..=body.span.end_line)
        .filter_map(|line| ctx.get_line(line).map(|text| (line, strip_comment(text))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks_sender() {
        assert!(checks_sender("{ require(msg.sender == owner, \"no\"); }"));
        assert!(checks_sender("{ if (owner != msg.sender) revert(); }"));
        assert!(checks_sender("{ _checkOwner(); }"));
        assert!(!checks_sender("{ balances[to] += 1; emit Sent(msg.sender); }"));
    }

    #[test]
    fn test_guard_names() {
        assert!(is_guard_name("onlyOwner"));
        assert!(is_guard_name("requiresAuth"));
        assert!(is_guard_name("onlyRole"));
        assert!(!is_guard_name("nonReentrant"));
        assert!(!is_guard_name("whenNotPaused"));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("x = 1; // tx.origin"), "x = 1; ");
    }
}
