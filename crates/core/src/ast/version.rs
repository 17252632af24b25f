use std::fmt;

/// A `major.minor.patch` compiler version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SolidityVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SolidityVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Compilers from 0.8.0 revert on arithmetic overflow
    pub fn has_checked_arithmetic(&self) -> bool {
        *self >= SolidityVersion::new(0, 8, 0)
    }
}

impl fmt::Display for SolidityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parsed `pragma solidity` constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    /// Lowest version mentioned in the constraint
    pub minimum: Option<SolidityVersion>,
    /// Constraint admits more than one compiler version
    pub floating: bool,
}

/// Parse a constraint such as `^0.8.0`, `>=0.6.0 <0.9.0` or `0.7.6`.
pub fn parse_constraint(constraint: &str) -> VersionConstraint {
    let constraint = constraint.trim();
    let floating = constraint.is_empty()
        || constraint.contains(['^', '~', '>', '<', '*', 'x', 'X', '|'])
        || constraint.contains(" - ");

    let minimum = constraint
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter_map(parse_version)
        .min();

    VersionConstraint { minimum, floating }
}

fn parse_version(text: &str) -> Option<SolidityVersion> {
    let mut parts = text.split('.').filter(|p| !p.is_empty());
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    Some(SolidityVersion::new(major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_version() {
        let c = parse_constraint("0.8.19");
        assert_eq!(c.minimum, Some(SolidityVersion::new(0, 8, 19)));
        assert!(!c.floating);
    }

    #[test]
    fn test_caret_version_floats() {
        let c = parse_constraint("^0.8.0");
        assert_eq!(c.minimum, Some(SolidityVersion::new(0, 8, 0)));
        assert!(c.floating);
    }

    #[test]
    fn test_range_takes_lowest() {
        let c = parse_constraint(">=0.6.2 <0.9.0");
        assert_eq!(c.minimum, Some(SolidityVersion::new(0, 6, 2)));
        assert!(c.floating);
        assert!(!c.minimum.unwrap().has_checked_arithmetic());
    }

    #[test]
    fn test_unparseable_constraint() {
        let c = parse_constraint("latest");
        assert_eq!(c.minimum, None);
    }
}
