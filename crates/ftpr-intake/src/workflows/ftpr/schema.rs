use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::domain::{Money, SubmissionForm, TenantId};
use super::fields::{validate, FieldKind, FieldRule, FieldValue};
use super::policy::IntakePolicy;
use super::violation::{Violation, ViolationCode};

pub const TENANT_ID: &str = "tenant_id";
pub const AMOUNT_OWED: &str = "amount_owed";
pub const COURT_CASE_NUMBER: &str = "court_case_number";
pub const WARRANT_ORDER_DATE: &str = "warrant_order_date";
pub const SCHEDULED_EVICTION_DATE: &str = "scheduled_eviction_date";
pub const SIGNER_NAME: &str = "signer_name";
pub const SUPPORTING_DOCUMENT: &str = "supporting_document";

/// Field-level rule bound to one submission input.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
    /// Skip the rule (and discard the input) when redemption is waived.
    pub ignored_when_waived: bool,
}

impl FieldSpec {
    fn new(name: &'static str, rule: FieldRule) -> Self {
        Self {
            name,
            rule,
            ignored_when_waived: false,
        }
    }
}

/// Record-level refinement evaluated once every field rule has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRule {
    AmountRequiredUnlessWaived,
    MinimumLeadTime { days: i64 },
}

impl RecordRule {
    pub fn check(&self, submission: &ValidatedSubmission, today: NaiveDate) -> Option<Violation> {
        match self {
            RecordRule::AmountRequiredUnlessWaived => {
                let missing = !submission.no_right_of_redemption
                    && !submission
                        .amount_owed
                        .map(Money::is_positive)
                        .unwrap_or(false);
                missing.then(|| {
                    Violation::field(
                        AMOUNT_OWED,
                        ViolationCode::AmountRequired,
                        "amount owed must be greater than zero unless the tenant has no right of redemption",
                    )
                })
            }
            RecordRule::MinimumLeadTime { days } => {
                // NaiveDate subtraction is whole midnight-to-midnight days in the caller's zone.
                let lead = (submission.scheduled_eviction_date - today).num_days();
                (lead < *days).then(|| {
                    let earliest = chrono::Duration::try_days(*days)
                        .and_then(|delta| today.checked_add_signed(delta));
                    let message = match earliest {
                        Some(earliest) => format!(
                            "scheduled eviction date must be at least {days} days from today ({} or later)",
                            earliest.format("%Y-%m-%d")
                        ),
                        None => format!(
                            "scheduled eviction date must be at least {days} days from today"
                        ),
                    };
                    Violation::field(
                        SCHEDULED_EVICTION_DATE,
                        ViolationCode::InsufficientLeadTime,
                        message,
                    )
                })
            }
        }
    }
}

/// Submission whose fields all passed validation, in typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub tenant_id: TenantId,
    pub no_right_of_redemption: bool,
    /// Always `None` when redemption is waived.
    pub amount_owed: Option<Money>,
    pub court_case_number: String,
    pub warrant_order_date: NaiveDate,
    pub scheduled_eviction_date: NaiveDate,
    pub signer_name: String,
    pub supporting_document: Option<String>,
}

/// Declarative record schema for a Failure To Pay Rent submission.
#[derive(Debug, Clone)]
pub struct SubmissionSchema {
    fields: Vec<FieldSpec>,
    rules: Vec<RecordRule>,
}

impl SubmissionSchema {
    pub fn new(fields: Vec<FieldSpec>, rules: Vec<RecordRule>) -> Self {
        Self { fields, rules }
    }

    pub fn standard(policy: &IntakePolicy) -> Self {
        let fields = vec![
            FieldSpec::new(
                TENANT_ID,
                FieldRule::required(FieldKind::Identifier { max_len: 64 }),
            ),
            FieldSpec {
                name: AMOUNT_OWED,
                rule: FieldRule::optional(FieldKind::Currency {
                    min: Some(Money::ZERO),
                    max: Some(Money::from_dollars(1_000_000)),
                }),
                ignored_when_waived: true,
            },
            FieldSpec::new(
                COURT_CASE_NUMBER,
                FieldRule::required(FieldKind::Text {
                    min_len: 1,
                    max_len: 64,
                }),
            ),
            FieldSpec::new(WARRANT_ORDER_DATE, FieldRule::required(FieldKind::Date)),
            FieldSpec::new(SCHEDULED_EVICTION_DATE, FieldRule::required(FieldKind::Date)),
            FieldSpec::new(
                SIGNER_NAME,
                FieldRule::required(FieldKind::Text {
                    min_len: 2,
                    max_len: 100,
                }),
            ),
            FieldSpec::new(
                SUPPORTING_DOCUMENT,
                FieldRule::optional(FieldKind::Text {
                    min_len: 1,
                    max_len: 255,
                }),
            ),
        ];

        let rules = vec![
            RecordRule::AmountRequiredUnlessWaived,
            RecordRule::MinimumLeadTime {
                days: policy.minimum_lead_days,
            },
        ];

        Self::new(fields, rules)
    }

    pub fn rules(&self) -> &[RecordRule] {
        &self.rules
    }

    /// Run every field rule, then (only if all passed) every record rule.
    ///
    /// Violations accumulate within each phase so the caller sees the complete set.
    pub fn evaluate(
        &self,
        form: &SubmissionForm,
        today: NaiveDate,
    ) -> Result<ValidatedSubmission, Vec<Violation>> {
        let mut values = BTreeMap::new();
        let mut violations = Vec::new();

        for spec in &self.fields {
            if spec.ignored_when_waived && form.no_right_of_redemption {
                continue;
            }
            match validate(spec.name, raw_value(form, spec.name), &spec.rule) {
                Ok(value) => {
                    values.insert(spec.name, value);
                }
                Err(violation) => violations.push(violation),
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        let submission = typed_submission(form, &values)?;

        let violations: Vec<Violation> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(&submission, today))
            .collect();

        if violations.is_empty() {
            Ok(submission)
        } else {
            Err(violations)
        }
    }
}

fn raw_value<'a>(form: &'a SubmissionForm, field: &str) -> Option<&'a str> {
    let value = match field {
        TENANT_ID => &form.tenant_id,
        AMOUNT_OWED => &form.amount_owed,
        COURT_CASE_NUMBER => &form.court_case_number,
        WARRANT_ORDER_DATE => &form.warrant_order_date,
        SCHEDULED_EVICTION_DATE => &form.scheduled_eviction_date,
        SIGNER_NAME => &form.signer_name,
        SUPPORTING_DOCUMENT => &form.supporting_document,
        _ => return None,
    };
    value.as_deref()
}

fn typed_submission(
    form: &SubmissionForm,
    values: &BTreeMap<&'static str, FieldValue>,
) -> Result<ValidatedSubmission, Vec<Violation>> {
    let mut violations = Vec::new();

    let mut text = |field: &'static str| -> String {
        match values.get(field).and_then(FieldValue::as_text) {
            Some(value) => value.to_string(),
            None => {
                violations.push(missing(field));
                String::new()
            }
        }
    };
    let tenant_id = text(TENANT_ID);
    let court_case_number = text(COURT_CASE_NUMBER);
    let signer_name = text(SIGNER_NAME);

    let mut date = |field: &'static str| -> Option<NaiveDate> {
        let value = values.get(field).and_then(FieldValue::as_date);
        if value.is_none() {
            violations.push(missing(field));
        }
        value
    };
    let warrant_order_date = date(WARRANT_ORDER_DATE);
    let scheduled_eviction_date = date(SCHEDULED_EVICTION_DATE);

    match (warrant_order_date, scheduled_eviction_date) {
        (Some(warrant_order_date), Some(scheduled_eviction_date)) if violations.is_empty() => {
            Ok(ValidatedSubmission {
                tenant_id: TenantId(tenant_id),
                no_right_of_redemption: form.no_right_of_redemption,
                amount_owed: if form.no_right_of_redemption {
                    None
                } else {
                    values.get(AMOUNT_OWED).and_then(FieldValue::as_money)
                },
                court_case_number,
                warrant_order_date,
                scheduled_eviction_date,
                signer_name,
                supporting_document: values
                    .get(SUPPORTING_DOCUMENT)
                    .and_then(FieldValue::as_text)
                    .map(str::to_string),
            })
        }
        _ => Err(violations),
    }
}

// Reached only when a custom schema omits or loosens a field the draft needs.
fn missing(field: &str) -> Violation {
    Violation::field(
        field,
        ViolationCode::Required,
        format!("{} is required", field.replace('_', " ")),
    )
}
