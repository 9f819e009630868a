//! Record selection by discriminator field.
//!
//! Multi-record files carry a discriminator value somewhere in each
//! record that says which record definition applies. A
//! [`RecordSelection`] names the field, the comparison and the expected
//! value; comparison is numeric whenever both sides parse as numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelectionOperator {
    #[default]
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl SelectionOperator {
    /// Parses the operator notation used in schema files.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "=" | "==" => Some(SelectionOperator::Equals),
            "!=" | "<>" => Some(SelectionOperator::NotEquals),
            ">" => Some(SelectionOperator::GreaterThan),
            ">=" => Some(SelectionOperator::GreaterOrEqual),
            "<" => Some(SelectionOperator::LessThan),
            "<=" => Some(SelectionOperator::LessOrEqual),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SelectionOperator::Equals => "=",
            SelectionOperator::NotEquals => "!=",
            SelectionOperator::GreaterThan => ">",
            SelectionOperator::GreaterOrEqual => ">=",
            SelectionOperator::LessThan => "<",
            SelectionOperator::LessOrEqual => "<=",
        }
    }
}

/// One record's selection rule: `field operator value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSelection {
    field_name: String,
    #[serde(default)]
    operator: SelectionOperator,
    value: String,
}

impl RecordSelection {
    pub fn new(field_name: impl Into<String>, value: impl Into<String>) -> Self {
        RecordSelection {
            field_name: field_name.into(),
            operator: SelectionOperator::Equals,
            value: value.into(),
        }
    }

    pub fn with_operator(mut self, operator: SelectionOperator) -> Self {
        self.operator = operator;
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn operator(&self) -> SelectionOperator {
        self.operator
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Tests a decoded field value against this rule. Both sides are
    /// trimmed; the comparison is numeric when both parse as numbers,
    /// otherwise textual with case-insensitive equality.
    pub fn matches(&self, actual: &str) -> bool {
        let expected = self.value.trim();
        let actual = actual.trim();
        if let (Ok(a), Ok(e)) = (Decimal::from_str(actual), Decimal::from_str(expected)) {
            match self.operator {
                SelectionOperator::Equals => a == e,
                SelectionOperator::NotEquals => a != e,
                SelectionOperator::GreaterThan => a > e,
                SelectionOperator::GreaterOrEqual => a >= e,
                SelectionOperator::LessThan => a < e,
                SelectionOperator::LessOrEqual => a <= e,
            }
        } else {
            match self.operator {
                SelectionOperator::Equals => actual.eq_ignore_ascii_case(expected),
                SelectionOperator::NotEquals => !actual.eq_ignore_ascii_case(expected),
                SelectionOperator::GreaterThan => actual > expected,
                SelectionOperator::GreaterOrEqual => actual >= expected,
                SelectionOperator::LessThan => actual < expected,
                SelectionOperator::LessOrEqual => actual <= expected,
            }
        }
    }
}
