use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use super::computed::{parse_date, value_kind};
use super::error::{Section, SectionFailure, ValidationError};
use super::tree::AttributeTree;

/// Scalar type a field must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Boolean,
    /// A JSON number or a numeric string such as `"1200.50"`.
    Number,
    /// Any date string or timestamp the date fields accept on write.
    Date,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

/// One constraint on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present, not null, and not an empty string, array or mapping.
    Required,
    Type(ValueType),
    Email,
    /// A string matching a `chrono` format, e.g. `"%Y-%m-%d"`.
    DateFormat(&'static str),
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::Type(ty) => write!(f, "type:{}", ty.name()),
            Self::Email => f.write_str("format:email"),
            Self::DateFormat(pattern) => write!(f, "format:date({pattern})"),
        }
    }
}

/// Rules attached to one path. `*` segments match every array element.
pub type FieldRules = (&'static str, &'static [Rule]);

/// The rules of one named section.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    pub section: Section,
    pub rules: &'static [FieldRules],
}

impl RuleSet {
    pub const fn new(section: Section, rules: &'static [FieldRules]) -> Self {
        Self { section, rules }
    }

    /// Check every rule of this section. Returns all violations found.
    ///
    /// Rules other than `required` are skipped for absent paths. A failing
    /// `required` stops the remaining rules of that path.
    pub fn check(&self, tree: &AttributeTree) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (pattern, rules) in self.rules {
            for path in expand_path(tree, pattern) {
                check_field(tree.get(&path), &path, rules, &mut errors);
            }
        }
        errors
    }

    pub fn validate(&self, tree: &AttributeTree) -> Result<(), SectionFailure> {
        let errors = self.check(tree);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SectionFailure {
                section: self.section,
                errors,
            })
        }
    }
}

/// Run sections in order and stop at the first one that fails.
pub fn validate_sections(tree: &AttributeTree, sections: &[RuleSet]) -> Result<(), SectionFailure> {
    for rule_set in sections {
        if let Err(failure) = rule_set.validate(tree) {
            tracing::debug!(
                section = %failure.section,
                violations = failure.errors.len(),
                "section validation failed"
            );
            return Err(failure);
        }
    }
    Ok(())
}

fn check_field(value: Option<&Value>, path: &str, rules: &[Rule], errors: &mut Vec<ValidationError>) {
    let required = rules.contains(&Rule::Required);
    match value {
        None => {
            if required {
                errors.push(ValidationError::new(path, "field is required", Rule::Required));
            }
        }
        Some(value) => {
            if required && is_blank(value) {
                errors.push(ValidationError::new(path, "field is required", Rule::Required));
                return;
            }
            for rule in rules {
                if let Some(message) = violation(*rule, value) {
                    errors.push(ValidationError::new(path, message, *rule));
                }
            }
        }
    }
}

fn violation(rule: Rule, value: &Value) -> Option<String> {
    match rule {
        Rule::Required => None,
        Rule::Type(ty) => {
            if matches_type(ty, value) {
                None
            } else {
                Some(format!("must be a {}, got {}", ty.name(), value_kind(value)))
            }
        }
        Rule::Email => match value.as_str() {
            Some(s) if is_valid_email(s) => None,
            _ => Some("must be a valid email address".to_string()),
        },
        Rule::DateFormat(pattern) => match value.as_str() {
            Some(s) if NaiveDate::parse_from_str(s, pattern).is_ok() => None,
            _ => Some(format!("must be a date in the format {pattern}")),
        },
    }
}

fn matches_type(ty: ValueType, value: &Value) -> bool {
    match ty {
        ValueType::String => value.is_string(),
        ValueType::Boolean => value.is_boolean(),
        ValueType::Number => match value {
            Value::Number(_) => true,
            Value::String(s) => s.trim().parse::<Decimal>().is_ok(),
            _ => false,
        },
        ValueType::Date => {
            matches!(value, Value::String(_) | Value::Number(_))
                && matches!(parse_date("", value), Ok(Some(_)))
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Basic address syntax check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }
    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

/// Concrete paths matched by a rule path; `*` fans out over arrays and mappings.
fn expand_path(tree: &AttributeTree, pattern: &str) -> Vec<String> {
    let Some(star) = pattern.find('*') else {
        return vec![pattern.to_string()];
    };
    let parent = pattern[..star].trim_end_matches('.');
    let rest = pattern[star + 1..].trim_start_matches('.');

    let children: Vec<String> = match tree.get(parent) {
        Some(Value::Array(items)) => (0..items.len()).map(|i| i.to_string()).collect(),
        Some(Value::Object(fields)) => fields.keys().cloned().collect(),
        _ => return Vec::new(),
    };

    children
        .into_iter()
        .flat_map(|child| {
            let next = if rest.is_empty() {
                format!("{parent}.{child}")
            } else {
                format!("{parent}.{child}.{rest}")
            };
            expand_path(tree, &next)
        })
        .collect()
}
