pub mod context;
pub mod registry;
pub mod traits;

pub use context::AnalysisContext;
pub use registry::RuleRegistry;
pub use traits::Rule;
