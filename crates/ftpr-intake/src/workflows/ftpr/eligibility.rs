use super::domain::{ExistingCase, Money, Property, PropertyType, SubsidyType, Tenant};
use super::policy::IntakePolicy;
use super::schema::{ValidatedSubmission, AMOUNT_OWED, SUPPORTING_DOCUMENT};
use super::violation::{Violation, ViolationCode};

/// Snapshot the domain gates inspect.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityContext<'a> {
    pub submission: &'a ValidatedSubmission,
    pub tenant: &'a Tenant,
    pub property: &'a Property,
    pub ledger: &'a [ExistingCase],
    pub subsidy_types: &'a [SubsidyType],
}

/// Independent admissibility gates applied after pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityRule {
    /// One unpaid, in-flight case per tenant. Drafts do not count.
    DuplicateRequest,
    /// Subsidized tenants may be pursued for at most `max_months` of rent.
    RedemptionCap { max_months: u32 },
    /// Special-notice subsidies on residential units need a supporting document.
    SupportingDocument,
}

impl EligibilityRule {
    pub fn check(&self, context: &EligibilityContext<'_>) -> Result<(), Violation> {
        match self {
            EligibilityRule::DuplicateRequest => {
                let duplicate = context.ledger.iter().find(|case| {
                    case.tenant_id == context.submission.tenant_id && case.is_in_flight()
                });
                match duplicate {
                    Some(case) => Err(Violation::domain(
                        ViolationCode::DuplicateRequest,
                        format!(
                            "tenant {} already has an unpaid request in progress (case {}, {})",
                            case.tenant_id,
                            case.case_id,
                            case.status.label()
                        ),
                    )),
                    None => Ok(()),
                }
            }
            EligibilityRule::RedemptionCap { max_months } => {
                let submission = context.submission;
                if !context.tenant.subsidized || submission.no_right_of_redemption {
                    return Ok(());
                }
                let (Some(amount), Some(rent)) =
                    (submission.amount_owed, context.tenant.monthly_rent)
                else {
                    return Ok(());
                };
                match months_owed(amount, rent) {
                    Some(months) if months > i64::from(*max_months) => Err(Violation::field(
                        AMOUNT_OWED,
                        ViolationCode::RedemptionCapExceeded,
                        format!(
                            "amount owed covers {months} months of rent; subsidized tenants are capped at {max_months} months"
                        ),
                    )),
                    _ => Ok(()),
                }
            }
            EligibilityRule::SupportingDocument => {
                let required = document_required(
                    context.property,
                    context.tenant,
                    context.subsidy_types,
                );
                if required && context.submission.supporting_document.is_none() {
                    Err(Violation::field(
                        SUPPORTING_DOCUMENT,
                        ViolationCode::DocumentRequired,
                        "a supporting document is required for this tenant's subsidy program",
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Ordered gate list; the first failing gate decides the outcome.
#[derive(Debug, Clone)]
pub struct EligibilityChecker {
    rules: Vec<EligibilityRule>,
}

impl EligibilityChecker {
    pub fn new(rules: Vec<EligibilityRule>) -> Self {
        Self { rules }
    }

    pub fn standard(policy: &IntakePolicy) -> Self {
        Self::new(vec![
            EligibilityRule::DuplicateRequest,
            EligibilityRule::RedemptionCap {
                max_months: policy.redemption_cap_months,
            },
            EligibilityRule::SupportingDocument,
        ])
    }

    pub fn rules(&self) -> &[EligibilityRule] {
        &self.rules
    }

    pub fn check(&self, context: &EligibilityContext<'_>) -> Result<(), Violation> {
        self.rules.iter().try_for_each(|rule| rule.check(context))
    }
}

/// The first catalog subsidy type is the "no special notice" sentinel.
pub fn document_required(
    property: &Property,
    tenant: &Tenant,
    subsidy_types: &[SubsidyType],
) -> bool {
    if property.property_type != PropertyType::Residential || !tenant.subsidized {
        return false;
    }

    match &tenant.subsidy_type {
        Some(subsidy) => subsidy_types
            .first()
            .map(|default| !default.0.trim().eq_ignore_ascii_case(subsidy.0.trim()))
            .unwrap_or(true),
        None => false,
    }
}

/// Months of rent an amount represents, rounded up. `None` when rent is not positive.
pub fn months_owed(amount: Money, monthly_rent: Money) -> Option<i64> {
    let rent = monthly_rent.cents();
    if rent <= 0 {
        return None;
    }
    let amount = amount.cents().max(0);
    if amount == 0 {
        return Some(0);
    }
    // Rounds up without forming `amount + rent`, which can overflow for large rents.
    Some((amount - 1) / rent + 1)
}
