//! Atomic validators for primitive form values.
//!
//! Each validator is a pure function of the field name, the raw user input and a [`FieldRule`].
//! Blank input normalizes to [`FieldValue::Absent`] so "not provided" never reads as zero.

use chrono::NaiveDate;

use super::domain::Money;
use super::violation::{Violation, ViolationCode};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldRule {
    pub fn required(kind: FieldKind) -> Self {
        Self {
            required: true,
            kind,
        }
    }

    pub fn optional(kind: FieldKind) -> Self {
        Self {
            required: false,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// ASCII letters, digits, `-`, `_` and `.`.
    Identifier { max_len: usize },
    Text { min_len: usize, max_len: usize },
    Date,
    Currency { min: Option<Money>, max: Option<Money> },
    /// Equality against another field's raw value, e.g. a confirmation input.
    Matches {
        other_field: String,
        other_value: Option<String>,
    },
}

/// Normalized value produced by a passing validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Absent,
    Text(String),
    Date(NaiveDate),
    Money(Money),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<Money> {
        match self {
            FieldValue::Money(value) => Some(*value),
            _ => None,
        }
    }
}

pub type FieldOutcome = Result<FieldValue, Violation>;

pub fn validate(field: &str, raw: Option<&str>, rule: &FieldRule) -> FieldOutcome {
    let value = match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value,
        None if rule.required => {
            return Err(Violation::field(
                field,
                ViolationCode::Required,
                format!("{} is required", label(field)),
            ))
        }
        None => return Ok(FieldValue::Absent),
    };

    match &rule.kind {
        FieldKind::Identifier { max_len } => validate_identifier(field, value, *max_len),
        FieldKind::Text { min_len, max_len } => validate_text(field, value, *min_len, *max_len),
        FieldKind::Date => parse_date(value).map(FieldValue::Date).ok_or_else(|| {
            Violation::field(
                field,
                ViolationCode::InvalidDate,
                format!("{} must be a valid date (YYYY-MM-DD)", label(field)),
            )
        }),
        FieldKind::Currency { min, max } => validate_currency(field, value, *min, *max),
        FieldKind::Matches {
            other_field,
            other_value,
        } => {
            if other_value.as_deref().map(str::trim) == Some(value) {
                Ok(FieldValue::Text(value.to_string()))
            } else {
                Err(Violation::field(
                    field,
                    ViolationCode::Mismatch,
                    format!("{} must match {}", label(field), label(other_field)),
                ))
            }
        }
    }
}

fn validate_identifier(field: &str, value: &str, max_len: usize) -> FieldOutcome {
    if value.len() > max_len {
        return Err(Violation::field(
            field,
            ViolationCode::TooLong,
            format!("{} must be at most {max_len} characters", label(field)),
        ));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(Violation::field(
            field,
            ViolationCode::InvalidFormat,
            format!("{} contains invalid characters", label(field)),
        ));
    }

    Ok(FieldValue::Text(value.to_string()))
}

fn validate_text(field: &str, value: &str, min_len: usize, max_len: usize) -> FieldOutcome {
    let length = value.chars().count();
    if length < min_len {
        return Err(Violation::field(
            field,
            ViolationCode::TooShort,
            format!("{} must be at least {min_len} characters", label(field)),
        ));
    }
    if length > max_len {
        return Err(Violation::field(
            field,
            ViolationCode::TooLong,
            format!("{} must be at most {max_len} characters", label(field)),
        ));
    }
    Ok(FieldValue::Text(value.to_string()))
}

fn validate_currency(
    field: &str,
    value: &str,
    min: Option<Money>,
    max: Option<Money>,
) -> FieldOutcome {
    let amount = parse_money(value).ok_or_else(|| {
        Violation::field(
            field,
            ViolationCode::InvalidAmount,
            format!("{} must be a dollar amount", label(field)),
        )
    })?;

    if let Some(min) = min {
        if amount < min {
            return Err(Violation::field(
                field,
                ViolationCode::OutOfRange,
                format!("{} must be at least {min}", label(field)),
            ));
        }
    }
    if let Some(max) = max {
        if amount > max {
            return Err(Violation::field(
                field,
                ViolationCode::OutOfRange,
                format!("{} must be at most {max}", label(field)),
            ));
        }
    }

    Ok(FieldValue::Money(amount))
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Parse `1,234.5`, `$1234.50` or `-12` into cents. At most two decimal places.
pub fn parse_money(value: &str) -> Option<Money> {
    let trimmed = value.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);

    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    let whole: String = whole.chars().filter(|c| *c != ',').collect();

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
        || fraction.len() > 2
    {
        return None;
    }

    let dollars: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    let total = dollars.checked_mul(100)?.checked_add(cents)?;
    Some(Money::from_cents(if negative { -total } else { total }))
}

fn label(field: &str) -> String {
    field.replace('_', " ")
}
