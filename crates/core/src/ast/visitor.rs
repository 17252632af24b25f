use tree_sitter::{Node, Tree};

use super::source_unit::*;
use super::utils::{self, children, node_text, span_of};

/// Syntax tree walker that extracts an owned [`SourceUnit`] from a parsed file.
/// `ERROR` subtrees are skipped so that malformed regions never produce facts.
pub struct SourceVisitor<'a> {
    source: &'a str,
    pub pragmas: Vec<Pragma>,
    pub contracts: Vec<ContractDef>,
}

impl<'a> SourceVisitor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pragmas: Vec::new(),
            contracts: Vec::new(),
        }
    }

    /// Visit a parsed tree, returning the extracted SourceUnit
    pub fn extract(source: &str, tree: &Tree) -> SourceUnit {
        let root = tree.root_node();
        let mut visitor = SourceVisitor::new(source);
        visitor.visit_source_file(root);

        SourceUnit {
            pragmas: visitor.pragmas,
            contracts: visitor.contracts,
            has_syntax_errors: root.has_error(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node_text(node, self.source)
    }

    fn visit_source_file(&mut self, root: Node<'_>) {
        for child in children(root) {
            match child.kind() {
                "pragma_directive" => self.visit_pragma(child),
                "contract_declaration" => self.visit_contract(child, ContractKind::Contract),
                "interface_declaration" => self.visit_contract(child, ContractKind::Interface),
                "library_declaration" => self.visit_contract(child, ContractKind::Library),
                _ => {}
            }
        }
    }

    /// Only `pragma solidity` directives are kept
    fn visit_pragma(&mut self, node: Node<'_>) {
        let text = self.text(node).trim();
        let Some(rest) = text.strip_prefix("pragma") else {
            return;
        };
        let Some(constraint) = rest.trim_start().strip_prefix("solidity") else {
            return;
        };
        self.pragmas.push(Pragma {
            constraint: constraint.trim().trim_end_matches(';').trim().to_string(),
            span: span_of(node),
        });
    }

    fn visit_contract(&mut self, node: Node<'_>, kind: ContractKind) {
        let Some(name) = utils::declaration_name(node, self.source) else {
            return;
        };
        let mut contract = ContractDef {
            name,
            kind,
            state_variables: Vec::new(),
            functions: Vec::new(),
            span: span_of(node),
        };

        let body = node
            .child_by_field_name("body")
            .or_else(|| children(node).into_iter().find(|c| c.kind() == "contract_body"));
        if let Some(body) = body {
            for member in children(body) {
                match member.kind() {
                    "state_variable_declaration" => {
                        if let Some(var) = self.state_variable(member) {
                            contract.state_variables.push(var);
                        }
                    }
                    "function_definition" => {
                        let mut function = self.function(member, FunctionKind::Function);
                        // Pre-0.5 constructors share the contract's name
                        if function.name == contract.name {
                            function.kind = FunctionKind::Constructor;
                        }
                        contract.functions.push(function);
                    }
                    "modifier_definition" => {
                        contract.functions.push(self.function(member, FunctionKind::Modifier))
                    }
                    "constructor_definition" => contract
                        .functions
                        .push(self.function(member, FunctionKind::Constructor)),
                    "fallback_receive_definition" => {
                        let kind = if self.text(member).trim_start().starts_with("receive") {
                            FunctionKind::Receive
                        } else {
                            FunctionKind::Fallback
                        };
                        contract.functions.push(self.function(member, kind));
                    }
                    _ => {}
                }
            }
        }

        self.contracts.push(contract);
    }

    fn state_variable(&self, node: Node<'_>) -> Option<StateVariable> {
        let name_node = node.child_by_field_name("name").or_else(|| {
            children(node)
                .into_iter()
                .filter(|c| c.kind() == "identifier")
                .last()
        })?;
        let type_name = node
            .child_by_field_name("type")
            .map(|t| utils::compact(self.text(t)))
            .unwrap_or_default();
        let qualifiers = self
            .source
            .get(node.start_byte()..name_node.start_byte())
            .unwrap_or("");
        Some(StateVariable {
            name: self.text(name_node).to_string(),
            type_name,
            is_constant: utils::contains_word(qualifiers, "constant")
                || utils::contains_word(qualifiers, "immutable"),
            span: span_of(node),
        })
    }

    fn function(&self, node: Node<'_>, kind: FunctionKind) -> FunctionDef {
        let name = match kind {
            FunctionKind::Function | FunctionKind::Modifier => {
                utils::declaration_name(node, self.source).unwrap_or_default()
            }
            FunctionKind::Constructor => "constructor".to_string(),
            FunctionKind::Fallback => "fallback".to_string(),
            FunctionKind::Receive => "receive".to_string(),
        };

        let mut visibility = None;
        let mut mutability = Mutability::NonPayable;
        let mut modifiers = Vec::new();
        let mut body_node = node.child_by_field_name("body");

        for child in children(node) {
            match child.kind() {
                "visibility" => visibility = parse_visibility(self.text(child).trim()),
                "state_mutability" => mutability = parse_mutability(self.text(child).trim()),
                "modifier_invocation" => {
                    if let Some(name) = self.modifier_name(child) {
                        modifiers.push(name);
                    }
                }
                "function_body" if body_node.is_none() => body_node = Some(child),
                _ => match self.text(child).trim() {
                    // anonymous tokens on constructors and pre-0.5 `constant` functions
                    "payable" => mutability = Mutability::Payable,
                    "constant" => mutability = Mutability::View,
                    "public" | "internal" if kind == FunctionKind::Constructor => {
                        visibility = parse_visibility(self.text(child).trim())
                    }
                    _ => {}
                },
            }
        }

        let default_visibility = match kind {
            FunctionKind::Modifier => Visibility::Internal,
            FunctionKind::Fallback | FunctionKind::Receive => Visibility::External,
            _ => Visibility::Public,
        };

        FunctionDef {
            name,
            kind,
            visibility: visibility.unwrap_or(default_visibility),
            mutability,
            modifiers,
            span: span_of(node),
            body: body_node.map(|b| self.function_body(b)),
        }
    }

    fn modifier_name(&self, node: Node<'_>) -> Option<String> {
        let text = self.text(node);
        let name: String = text
            .split('(')
            .next()
            .map(utils::compact)
            .unwrap_or_default();
        // `Base.onlyOwner` style paths resolve to their last segment
        let name = name.rsplit('.').next().unwrap_or(&name).to_string();
        (!name.is_empty()).then_some(name)
    }

    fn function_body(&self, node: Node<'_>) -> FunctionBody {
        let mut body = FunctionBody {
            text: self.text(node).to_string(),
            span: span_of(node),
            ..FunctionBody::default()
        };
        self.collect_facts(node, &mut body);
        body
    }

    /// Pre-order walk collecting calls, writes and loops. Uses an explicit
    /// stack so nesting depth is bounded by the heap, not the thread stack.
    /// `ERROR` and inline assembly subtrees are not entered.
    fn collect_facts(&self, root: Node<'_>, body: &mut FunctionBody) {
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            if matches!(node.kind(), "ERROR" | "assembly_statement") {
                continue;
            }
            self.record_fact(node, body);
            let mut kids = children(node);
            kids.reverse();
            pending.extend(kids);
        }
    }

    fn record_fact(&self, node: Node<'_>, body: &mut FunctionBody) {
        match node.kind() {
            "call_expression" => body.calls.push(self.call_site(node)),
            "assignment_expression" | "augmented_assignment_expression" => {
                if let Some(assignment) = self.assignment(node) {
                    body.assignments.push(assignment);
                }
            }
            "update_expression" => {
                let text = self.text(node);
                let target = utils::root_identifier(text.trim_matches(|c| c == '+' || c == '-'));
                if !target.is_empty() {
                    body.assignments.push(Assignment {
                        target,
                        text: text.to_string(),
                        span: span_of(node),
                        offset: node.start_byte(),
                        is_arithmetic: true,
                    });
                }
            }
            "unary_expression" => {
                let text = self.text(node);
                if let Some(operand) = text.trim_start().strip_prefix("delete") {
                    let target = utils::root_identifier(operand);
                    if !target.is_empty() {
                        body.assignments.push(Assignment {
                            target,
                            text: text.to_string(),
                            span: span_of(node),
                            offset: node.start_byte(),
                            is_arithmetic: false,
                        });
                    }
                }
            }
            "for_statement" | "while_statement" | "do_while_statement" => {
                body.loops.push(self.loop_site(node))
            }
            _ => {}
        }
    }

    fn call_site(&self, node: Node<'_>) -> CallSite {
        let text = self.text(node);
        CallSite {
            callee: utils::callee_of(text),
            text: text.to_string(),
            span: span_of(node),
            offset: node.start_byte(),
            result_discarded: is_statement_level(node),
        }
    }

    fn assignment(&self, node: Node<'_>) -> Option<Assignment> {
        let text = self.text(node);
        let lhs = text[..text.find('=')?].trim_end();
        let is_arithmetic = node.kind() == "augmented_assignment_expression"
            && lhs.ends_with(['+', '-', '*', '/', '%']);
        let left = match node.child_by_field_name("left") {
            Some(left) => self.text(left),
            None => lhs,
        };
        let target = utils::root_identifier(left);
        if target.is_empty() {
            return None;
        }
        Some(Assignment {
            target,
            text: text.to_string(),
            span: span_of(node),
            offset: node.start_byte(),
            is_arithmetic,
        })
    }

    fn loop_site(&self, node: Node<'_>) -> LoopSite {
        let text = self.text(node);
        let header = match node.child_by_field_name("body") {
            Some(body) => {
                let start = body.start_byte().saturating_sub(node.start_byte());
                let end = body.end_byte().saturating_sub(node.start_byte());
                let mut header = text.get(..start).unwrap_or("").to_string();
                header.push_str(text.get(end..).unwrap_or(""));
                header
            }
            None => text.lines().next().unwrap_or("").to_string(),
        };
        LoopSite {
            header: header.trim().to_string(),
            span: span_of(node),
        }
    }
}

/// A call is statement-level when only `expression` wrappers sit between it
/// and an `expression_statement`.
fn is_statement_level(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "expression" | "parenthesized_expression" => current = parent.parent(),
            "expression_statement" => return true,
            _ => return false,
        }
    }
    false
}

fn parse_visibility(text: &str) -> Option<Visibility> {
    match text {
        "public" => Some(Visibility::Public),
        "external" => Some(Visibility::External),
        "internal" => Some(Visibility::Internal),
        "private" => Some(Visibility::Private),
        _ => None,
    }
}

fn parse_mutability(text: &str) -> Mutability {
    match text {
        "pure" => Mutability::Pure,
        "view" | "constant" => Mutability::View,
        "payable" => Mutability::Payable,
        _ => Mutability::NonPayable,
    }
}
