//! Pre-flight validation of calculation inputs.
//!
//! Validation runs before the calculator is allowed to start. Issues come in
//! two severities: an [`Error`](IssueSeverity::Error) blocks the run, a
//! [`Warning`](IssueSeverity::Warning) is reported and logged but does not.
//!
//! Validators never attempt to repair input; they only report. The calculate
//! path assumes validated input and does not re-guard the formula domains.

use std::fmt;

// =============================================================================
// Validation Issues
// =============================================================================

/// Severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Blocks the calculation from running.
    Error,
    /// Reported but does not block the calculation.
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Error => write!(f, "error"),
            IssueSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation finding.
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    /// Severity of the finding.
    pub severity: IssueSeverity,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    /// Create an error-level issue.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

// =============================================================================
// Validation Report
// =============================================================================

/// Collected validation issues for one calculation input.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue to the report.
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Add an error-level issue.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ValidationIssue::error(message));
    }

    /// Add a warning-level issue.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ValidationIssue::warning(message));
    }

    /// All collected issues in insertion order.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Whether any error-level issue was collected.
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }

    /// Whether any warning-level issue was collected.
    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Warning)
    }

    /// Whether the input may proceed to calculation.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Consume the report, returning the issue list.
    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }
}

// =============================================================================
// Range checks
// =============================================================================

/// Report an error if `value` lies outside `[min, max]`.
pub fn check_range(report: &mut ValidationReport, field: &str, value: f64, min: f64, max: f64) {
    if !(min..=max).contains(&value) {
        report.error(format!(
            "{field} = {value} outside allowed range [{min}, {max}]"
        ));
    }
}

/// Report an error if `value` is not strictly positive.
pub fn check_positive(report: &mut ValidationReport, field: &str, value: f64) {
    if !(value > 0.0) {
        report.error(format!("{field} = {value} must be positive"));
    }
}
