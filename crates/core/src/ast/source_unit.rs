use serde::Serialize;

/// Source location (1-based lines, 0-based columns)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub start_col: usize,
    pub end_col: usize,
}

/// A `pragma solidity ...;` directive
#[derive(Debug, Clone, Serialize)]
pub struct Pragma {
    /// Version constraint text, e.g. `^0.8.0` or `>=0.6.0 <0.9.0`
    pub constraint: String,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContractKind {
    Contract,
    Interface,
    Library,
}

/// A contract-level storage variable
#[derive(Debug, Clone, Serialize)]
pub struct StateVariable {
    pub name: String,
    pub type_name: String,
    /// `constant` or `immutable`, never written after construction
    pub is_constant: bool,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionKind {
    Function,
    Constructor,
    Fallback,
    Receive,
    Modifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Public,
    External,
    Internal,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mutability {
    Pure,
    View,
    Payable,
    NonPayable,
}

/// A function call inside a function body
#[derive(Debug, Clone, Serialize)]
pub struct CallSite {
    /// Callee expression with call options stripped, e.g. `msg.sender.call`
    pub callee: String,
    /// Full call text
    pub text: String,
    pub span: SourceSpan,
    /// Byte offset into the source, used to order calls against writes
    pub offset: usize,
    /// True when the call is a bare expression statement (return value unused)
    pub result_discarded: bool,
}

impl CallSite {
    /// Member name of the callee, e.g. `call` for `addr.call`
    pub fn method(&self) -> &str {
        self.callee.rsplit('.').next().unwrap_or(&self.callee)
    }

    pub fn is_low_level(&self) -> bool {
        self.callee.contains('.')
            && matches!(self.method(), "call" | "delegatecall" | "staticcall" | "send")
    }
}

/// An assignment or compound assignment (`=`, `+=`, `++`, `delete`, ...)
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    /// Root identifier being written, e.g. `balances` for `balances[msg.sender] -= x`
    pub target: String,
    pub text: String,
    pub span: SourceSpan,
    pub offset: usize,
    /// True for compound arithmetic (`+=`, `-=`, `*=`, `++`, `--`)
    pub is_arithmetic: bool,
}

/// A `for`, `while` or `do ... while` loop
#[derive(Debug, Clone, Serialize)]
pub struct LoopSite {
    /// Loop header text (condition part)
    pub header: String,
    pub span: SourceSpan,
}

/// Facts extracted from a function body
#[derive(Debug, Clone, Default, Serialize)]
pub struct FunctionBody {
    pub text: String,
    pub span: SourceSpan,
    pub calls: Vec<CallSite>,
    pub assignments: Vec<Assignment>,
    pub loops: Vec<LoopSite>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub kind: FunctionKind,
    pub visibility: Visibility,
    pub mutability: Mutability,
    /// Modifier invocations applied to the function, by name
    pub modifiers: Vec<String>,
    pub span: SourceSpan,
    pub body: Option<FunctionBody>,
}

impl FunctionDef {
    /// Callable from outside the contract
    pub fn is_externally_callable(&self) -> bool {
        match self.kind {
            FunctionKind::Fallback | FunctionKind::Receive => true,
            FunctionKind::Function => {
                matches!(self.visibility, Visibility::Public | Visibility::External)
            }
            FunctionKind::Constructor | FunctionKind::Modifier => false,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.mutability, Mutability::Pure | Mutability::View)
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m == name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractDef {
    pub name: String,
    pub kind: ContractKind,
    pub state_variables: Vec<StateVariable>,
    /// Includes modifier definitions (kind = Modifier)
    pub functions: Vec<FunctionDef>,
    pub span: SourceSpan,
}

impl ContractDef {
    pub fn is_state_variable(&self, name: &str) -> bool {
        self.state_variables
            .iter()
            .any(|v| v.name == name && !v.is_constant)
    }

    pub fn state_variable(&self, name: &str) -> Option<&StateVariable> {
        self.state_variables.iter().find(|v| v.name == name)
    }

    pub fn modifier(&self, name: &str) -> Option<&FunctionDef> {
        self.functions
            .iter()
            .find(|f| f.kind == FunctionKind::Modifier && f.name == name)
    }
}

/// Top-level container for a parsed Solidity source unit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceUnit {
    pub pragmas: Vec<Pragma>,
    pub contracts: Vec<ContractDef>,
    /// The parser recovered from at least one syntax error
    pub has_syntax_errors: bool,
}

impl SourceUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate (contract, function) pairs across all contracts
    pub fn functions(&self) -> impl Iterator<Item = (&ContractDef, &FunctionDef)> {
        self.contracts
            .iter()
            .flat_map(|c| c.functions.iter().map(move |f| (c, f)))
    }
}
