//! # Schema Linter Module
//!
//! Flags declarations that extract cleanly but are probably mistakes.
//!
//! ## Checks Performed
//!
//! 1. **Unknown constraint tokens** - tokens permissive parsing drops silently
//! 2. **Inverted bounds** - `min` greater than `max`, nothing can validate
//! 3. **Enum default not a member** - the default is returned unchecked
//! 4. **Non-numeric integer default** - every empty request fails with "must be int"
//! 5. **Required with default** - the default can never apply
//! 6. **Lookup key collisions** - two fields read the same parameter
//! 7. **Missing records** - the endpoint's record is built with `Default`
//! 8. **Duplicate routes** - generation fails
//! 9. **Relative routes** - routes are matched against absolute request paths
//! 10. **Bounds outside the field type** - such values fail with "must be int" first
//!
//! ## Usage
//!
//! ```rust,no_run
//! use apigen::linter::{lint_source, print_lint_issues};
//! use apigen::schema::ExtractOptions;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let issues = lint_source(Path::new("src/api.rs"), &ExtractOptions::default())?;
//! print_lint_issues(&issues);
//! # Ok(())
//! # }
//! ```

use crate::constraint::unrecognized_tokens;
use crate::schema::{
    extract_schema, ExtractOptions, FieldKind, ParameterField, ParameterRecord, Schema,
};
use anyhow::Context;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// Error - generation fails or the endpoint can never succeed
    Error,
    /// Warning - probably unintended
    Warning,
    /// Info - harmless but redundant
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
            LintSeverity::Info => write!(f, "info"),
        }
    }
}

/// A lint issue found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    /// Where the issue occurred (e.g. "record:CreateParams.status", "endpoint:MyApi::create")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g. "unknown_constraint_token")
    pub kind: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Read, extract and lint a source file.
///
/// Fatal extraction errors are returned as `Err`, not as issues.
pub fn lint_source(path: &Path, opts: &ExtractOptions) -> anyhow::Result<Vec<LintIssue>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file {}", path.display()))?;
    let schema = extract_schema(&source, opts)
        .with_context(|| format!("failed to extract schema from {}", path.display()))?;
    Ok(lint_schema(&schema))
}

/// Lint an extracted schema. Issues are ordered by declaration.
pub fn lint_schema(schema: &Schema) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    for record in &schema.records {
        lint_record(record, &mut issues);
    }
    for service in &schema.services {
        let mut routes: HashMap<&str, &str> = HashMap::new();
        for ep in &service.endpoints {
            let location = format!("endpoint:{}::{}", service.name, ep.name);
            let route = ep.directive.url.as_str();

            if let Some(first) = routes.insert(route, ep.name.as_str()) {
                issues.push(
                    LintIssue::new(
                        &location,
                        LintSeverity::Error,
                        "duplicate_route",
                        format!("route `{route}` is already served by `{first}`"),
                    )
                    .with_suggestion("give each endpoint of a service its own url"),
                );
            }
            if !route.starts_with('/') {
                issues.push(
                    LintIssue::new(
                        &location,
                        LintSeverity::Warning,
                        "route_not_absolute",
                        format!("route `{route}` does not start with `/` and will never match"),
                    )
                    .with_suggestion(format!("use `/{route}`")),
                );
            }
            if schema.record(&ep.record).is_none() {
                issues.push(
                    LintIssue::new(
                        &location,
                        LintSeverity::Warning,
                        "missing_record",
                        format!(
                            "record `{}` was not found; it will be built with Default and no validation",
                            ep.record
                        ),
                    )
                    .with_suggestion("declare the record in the same file with a name containing the record marker"),
                );
            }
        }
    }
    issues
}

fn lint_record(record: &ParameterRecord, issues: &mut Vec<LintIssue>) {
    let mut keys: HashMap<String, &str> = HashMap::new();
    for field in &record.fields {
        let location = format!("record:{}.{}", record.name, field.name);
        lint_field(field, &location, issues);

        let key = field.lookup_key();
        if let Some(first) = keys.insert(key.clone(), field.name.as_str()) {
            issues.push(
                LintIssue::new(
                    &location,
                    LintSeverity::Error,
                    "lookup_key_collision",
                    format!("parameter `{key}` is also read by field `{first}`"),
                )
                .with_suggestion("set a distinct paramname= on one of the fields"),
            );
        }
    }
}

fn lint_field(field: &ParameterField, location: &str, issues: &mut Vec<LintIssue>) {
    let c = &field.constraints;

    for token in unrecognized_tokens(&field.expression) {
        issues.push(
            LintIssue::new(
                location,
                LintSeverity::Warning,
                "unknown_constraint_token",
                format!("constraint token `{token}` is ignored"),
            )
            .with_suggestion("fix the token or run with --strict to reject it"),
        );
    }

    if let (Some(min), Some(max)) = (c.min, c.max) {
        if min > max {
            issues.push(LintIssue::new(
                location,
                LintSeverity::Error,
                "inverted_bounds",
                format!("min={min} is greater than max={max}; no value can pass"),
            ));
        }
    }

    if let Some(e) = &c.enumeration {
        if let Some(default) = &e.default {
            if !e.contains(default) {
                issues.push(
                    LintIssue::new(
                        location,
                        LintSeverity::Warning,
                        "enum_default_not_member",
                        format!(
                            "default `{default}` is not one of [{}]",
                            e.values.join(", ")
                        ),
                    )
                    .with_suggestion(format!("add `{default}` to the enum or change the default")),
                );
            }
        }
    }

    if let Some((lo, hi)) = integer_range(&field.type_name) {
        for (key, bound) in [("min", c.min), ("max", c.max)] {
            let Some(bound) = bound else { continue };
            if bound < lo || bound > hi {
                issues.push(
                    LintIssue::new(
                        location,
                        LintSeverity::Warning,
                        "bound_outside_type_range",
                        format!(
                            "{key}={bound} is outside the range of {} ({lo}..={hi}); values beyond the type fail with \"must be int\"",
                            field.type_name
                        ),
                    )
                    .with_suggestion("declare a wider integer type or a bound within the type's range"),
                );
            }
        }
    }

    if field.kind == FieldKind::Integer {
        if let Some(default) = c.fallback() {
            if default.parse::<i64>().is_err() {
                issues.push(LintIssue::new(
                    location,
                    LintSeverity::Error,
                    "non_numeric_default",
                    format!("default `{default}` on an integer field is not a number"),
                ));
            }
        }
    }

    if c.required && c.fallback().is_some() {
        issues.push(
            LintIssue::new(
                location,
                LintSeverity::Info,
                "required_with_default",
                "field is required, so its default is never used",
            )
            .with_suggestion("drop either `required` or `default=`"),
        );
    }
}

/// Value range of a declared integer type narrower than `i64`.
fn integer_range(type_name: &str) -> Option<(i64, i64)> {
    let range = match type_name {
        "i8" => (i64::from(i8::MIN), i64::from(i8::MAX)),
        "i16" => (i64::from(i16::MIN), i64::from(i16::MAX)),
        "i32" => (i64::from(i32::MIN), i64::from(i32::MAX)),
        "u8" => (0, i64::from(u8::MAX)),
        "u16" => (0, i64::from(u16::MAX)),
        "u32" => (0, i64::from(u32::MAX)),
        _ => return None,
    };
    Some(range)
}

pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Print lint issues grouped by severity
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let count = |s: LintSeverity| issues.iter().filter(|i| i.severity == s).count();
    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );

    for (severity, heading) in [
        (LintSeverity::Error, "❌ Errors (must fix):"),
        (LintSeverity::Warning, "⚠️  Warnings (should fix):"),
        (LintSeverity::Info, "ℹ️  Info:"),
    ] {
        let group: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        println!("{heading}");
        for issue in group {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {}", suggestion);
            }
        }
        println!();
    }
}

/// Fail when any error-level issue is present.
pub fn fail_if_errors(issues: &[LintIssue]) -> anyhow::Result<()> {
    let errors = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("{errors} lint error(s) found");
    }
    Ok(())
}
