use crate::ast::SourceUnit;

/// Read-only view handed to every rule: the raw source and its parsed model.
pub struct AnalysisContext<'a> {
    pub contract_name: &'a str,
    pub unit: &'a SourceUnit,
    source: &'a str,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(contract_name: &'a str, source: &'a str, unit: &'a SourceUnit) -> Self {
        Self {
            contract_name,
            unit,
            source,
        }
    }

    pub fn source_code(&self) -> &'a str {
        self.source
    }

    /// Get source line by number (1-indexed)
    pub fn get_line(&self, line: usize) -> Option<&'a str> {
        if line == 0 {
            return None;
        }
        self.source.lines().nth(line - 1)
    }

    /// Extract snippet (start_line and end_line are 1-based inclusive)
    pub fn snippet(&self, start_line: usize, end_line: usize) -> Option<String> {
        let lines: Vec<&str> = self.source.lines().collect();
        let start = start_line.saturating_sub(1);
        let end = end_line.min(lines.len());
        if start >= end {
            return None;
        }
        Some(lines[start..end].join("\n"))
    }

    /// Single trimmed source line, for finding code excerpts
    pub fn line_excerpt(&self, line: usize) -> Option<String> {
        self.get_line(line).map(|l| l.trim().to_string())
    }
}
