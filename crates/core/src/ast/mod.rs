pub mod parser;
pub mod source_unit;
pub mod utils;
pub mod version;
pub mod visitor;

pub use parser::parse_source;
pub use source_unit::*;
pub use version::{parse_constraint, SolidityVersion, VersionConstraint};
pub use visitor::SourceVisitor;
