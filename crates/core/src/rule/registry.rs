use super::traits::Rule;

/// Ordered collection of rules. Registration order is evaluation and
/// reporting order.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Register multiple rules at once
    pub fn register_all(&mut self, rules: Vec<Box<dyn Rule>>) {
        self.rules.extend(rules);
    }

    /// All registered rules, in insertion order
    pub fn all(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// List all registered rule ids
    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Keep only rules matching the predicate
    pub fn retain(&mut self, mut keep: impl FnMut(&dyn Rule) -> bool) {
        self.rules.retain(|r| keep(r.as_ref()));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Box<dyn Rule>>> for RuleRegistry {
    fn from(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::finding::*;
    use crate::rule::AnalysisContext;

    struct MockRule(&'static str);

    impl Rule for MockRule {
        fn id(&self) -> &str {
            self.0
        }
        fn title(&self) -> &str {
            "Mock"
        }
        fn description(&self) -> &str {
            "A mock rule for testing"
        }
        fn severity(&self) -> Severity {
            Severity::Medium
        }
        fn confidence(&self) -> Confidence {
            Confidence::High
        }
        fn evaluate(&self, _context: &AnalysisContext) -> Result<Vec<Finding>, RuleError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_register_preserves_order() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(MockRule("b")));
        registry.register(Box::new(MockRule("a")));
        registry.register_all(vec![Box::new(MockRule("c"))]);
        assert_eq!(registry.ids(), vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_empty_registry() {
        let registry = RuleRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_retain() {
        let mut registry = RuleRegistry::from(vec![
            Box::new(MockRule("keep")) as Box<dyn Rule>,
            Box::new(MockRule("drop")),
        ]);
        registry.retain(|r| r.id() != "drop");
        assert_eq!(registry.ids(), vec!["keep"]);
    }
}
