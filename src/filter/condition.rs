use crate::data::datatable::parse_datetime;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter type of a column, driving which operators its editor offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterType {
    String,
    Number,
    Boolean,
    Date,
    DateTime,
    Duration,
    Unknown,
}

impl FilterType {
    /// The operator set a column of this type may legally use
    pub fn legal_operators(&self) -> &'static [FilterOperator] {
        use FilterOperator::*;
        match self {
            FilterType::String | FilterType::Unknown => &[
                Equal, NotEqual, Like, NotLike, ILike, NotILike, In, NotIn, IsNull, IsNotNull,
            ],
            FilterType::Number => &[
                Equal,
                NotEqual,
                LessThan,
                LessThanOrEqual,
                GreaterThan,
                GreaterThanOrEqual,
                In,
                NotIn,
                Between,
                NotBetween,
                IsNull,
                IsNotNull,
            ],
            FilterType::Boolean => &[Equal, NotEqual, IsNull, IsNotNull],
            FilterType::Date | FilterType::DateTime | FilterType::Duration => &[
                Equal,
                NotEqual,
                LessThan,
                LessThanOrEqual,
                GreaterThan,
                GreaterThanOrEqual,
                Between,
                NotBetween,
                IsNull,
                IsNotNull,
            ],
        }
    }

    pub fn allows(&self, operator: FilterOperator) -> bool {
        self.legal_operators().contains(&operator)
    }
}

/// How many operands an operator carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandArity {
    /// IS NULL / IS NOT NULL
    None,
    Single,
    /// IN / NOT IN
    List,
    /// BETWEEN / NOT BETWEEN
    Pair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Like,
    NotLike,
    ILike,
    NotILike,
    In,
    NotIn,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,
}

impl FilterOperator {
    pub fn arity(&self) -> OperandArity {
        use FilterOperator::*;
        match self {
            IsNull | IsNotNull => OperandArity::None,
            In | NotIn => OperandArity::List,
            Between | NotBetween => OperandArity::Pair,
            _ => OperandArity::Single,
        }
    }

    pub fn requires_operand(&self) -> bool {
        self.arity() != OperandArity::None
    }

    pub fn label(&self) -> &'static str {
        use FilterOperator::*;
        match self {
            Equal => "=",
            NotEqual => "!=",
            LessThan => "<",
            LessThanOrEqual => "<=",
            GreaterThan => ">",
            GreaterThanOrEqual => ">=",
            Like => "LIKE",
            NotLike => "NOT LIKE",
            ILike => "ILIKE",
            NotILike => "NOT ILIKE",
            In => "IN",
            NotIn => "NOT IN",
            Between => "BETWEEN",
            NotBetween => "NOT BETWEEN",
            IsNull => "IS NULL",
            IsNotNull => "IS NOT NULL",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A typed filter operand value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Fractional seconds
    Duration(f64),
}

/// Why an operand string failed to become a FilterValue
///
/// Empty and Invalid are deliberately distinct: an empty edit clears the
/// filter, garbage input must not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueParseError {
    Empty,
    Invalid,
}

/// Parse a duration expressed as seconds or with an ms/s/m/h suffix
pub fn parse_duration_secs(input: &str) -> Option<f64> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    let secs = if let Some(rest) = s.strip_suffix("ms") {
        rest.trim().parse::<f64>().ok()? / 1000.0
    } else if let Some(rest) = s.strip_suffix('s') {
        rest.trim().parse::<f64>().ok()?
    } else if let Some(rest) = s.strip_suffix('m') {
        rest.trim().parse::<f64>().ok()? * 60.0
    } else if let Some(rest) = s.strip_suffix('h') {
        rest.trim().parse::<f64>().ok()? * 3600.0
    } else {
        s.parse::<f64>().ok()?
    };

    secs.is_finite().then_some(secs)
}

/// Format seconds so that `parse_duration_secs` reads the same value back
pub fn format_duration_secs(secs: f64) -> String {
    format!("{}s", secs)
}

/// Parse a raw operand string into a typed value for the given filter type
pub fn parse_value(filter_type: FilterType, raw: &str) -> Result<FilterValue, ValueParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValueParseError::Empty);
    }

    match filter_type {
        FilterType::String | FilterType::Unknown => Ok(FilterValue::Text(trimmed.to_string())),
        FilterType::Number => {
            let n: f64 = trimmed.parse().map_err(|_| ValueParseError::Invalid)?;
            if n.is_finite() {
                Ok(FilterValue::Number(n))
            } else {
                Err(ValueParseError::Invalid)
            }
        }
        FilterType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(FilterValue::Bool(true)),
            "false" | "0" | "no" => Ok(FilterValue::Bool(false)),
            _ => Err(ValueParseError::Invalid),
        },
        FilterType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(FilterValue::Date)
            .map_err(|_| ValueParseError::Invalid),
        FilterType::DateTime => parse_datetime(trimmed)
            .map(FilterValue::DateTime)
            .ok_or(ValueParseError::Invalid),
        FilterType::Duration => parse_duration_secs(trimmed)
            .map(FilterValue::Duration)
            .ok_or(ValueParseError::Invalid),
    }
}

/// Render a typed value back to editor text; inverse of `parse_value`
pub fn format_value(value: &FilterValue) -> String {
    match value {
        FilterValue::Text(s) => s.clone(),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        FilterValue::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        FilterValue::Duration(secs) => format_duration_secs(*secs),
    }
}

/// Operand payload attached to a comparison, shaped by the operator's arity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterOperand {
    None,
    Single(FilterValue),
    List(Vec<FilterValue>),
    Range(FilterValue, FilterValue),
}

/// A filter condition tree
///
/// Leaves compare a column against an operand; compound nodes combine
/// children with AND/OR/NOT (NOT has a single child).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterCondition {
    Compare {
        column: String,
        operator: FilterOperator,
        operand: FilterOperand,
    },
    And(Box<FilterCondition>, Box<FilterCondition>),
    Or(Box<FilterCondition>, Box<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl FilterCondition {
    pub fn compare(
        column: impl Into<String>,
        operator: FilterOperator,
        operand: FilterOperand,
    ) -> Self {
        FilterCondition::Compare {
            column: column.into(),
            operator,
            operand,
        }
    }

    /// Left-to-right AND-reduce of per-column conditions into one predicate
    pub fn conjoin(conditions: impl IntoIterator<Item = FilterCondition>) -> Option<Self> {
        conditions
            .into_iter()
            .reduce(|acc, next| FilterCondition::And(Box::new(acc), Box::new(next)))
    }

    /// Columns referenced anywhere in the tree
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterCondition::Compare { column, .. } => out.push(column),
            FilterCondition::And(l, r) | FilterCondition::Or(l, r) => {
                l.collect_columns(out);
                r.collect_columns(out);
            }
            FilterCondition::Not(inner) => inner.collect_columns(out),
        }
    }
}
