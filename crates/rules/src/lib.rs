mod common;

pub mod floating_pragma;
pub mod integer_overflow;
pub mod missing_access_control;
pub mod reentrancy;
pub mod timestamp_dependence;
pub mod tx_origin_auth;
pub mod unbounded_loop;
pub mod unchecked_low_level_call;
pub mod unprotected_selfdestruct;
pub mod unsafe_delegatecall;

use blockscope::rule::{Rule, RuleRegistry};

/// Returns all built-in rules, most severe first
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(reentrancy::Reentrancy),
        Box::new(unprotected_selfdestruct::UnprotectedSelfdestruct),
        Box::new(tx_origin_auth::TxOriginAuth),
        Box::new(unsafe_delegatecall::UnsafeDelegatecall),
        Box::new(missing_access_control::MissingAccessControl),
        Box::new(unchecked_low_level_call::UncheckedLowLevelCall),
        Box::new(integer_overflow::IntegerOverflow),
        Box::new(unbounded_loop::UnboundedLoop),
        Box::new(timestamp_dependence::TimestampDependence),
        Box::new(floating_pragma::FloatingPragma),
    ]
}

/// Registry pre-loaded with [`all_rules`]
pub fn default_registry() -> RuleRegistry {
    RuleRegistry::from(all_rules())
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_ids_are_unique() {
        let rules = all_rules();
        let ids: HashSet<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_default_registry_order() {
        let registry = default_registry();
        assert_eq!(registry.ids().first(), Some(&"reentrancy"));
        assert_eq!(registry.ids().last(), Some(&"floating-pragma"));
    }
}
