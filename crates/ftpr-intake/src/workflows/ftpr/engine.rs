use chrono::NaiveDate;
use serde::Serialize;

use super::catalog::PropertyCatalog;
use super::domain::{
    Account, CaseDraft, CaseStatus, ExistingCase, Money, PaymentStatus, SubmissionForm, TenantId,
};
use super::eligibility::{document_required, EligibilityChecker, EligibilityContext};
use super::policy::IntakePolicy;
use super::pricing::{PricingResolver, Quote};
use super::schema::{SubmissionSchema, TENANT_ID};
use super::violation::{Violation, ViolationCode};

/// Immutable snapshot a single intake decision is made over.
#[derive(Clone, Copy)]
pub struct IntakeRequest<'a> {
    pub submission: &'a SubmissionForm,
    /// `None` when the caller could not establish an authenticated account.
    pub account: Option<&'a Account>,
    pub catalog: &'a dyn PropertyCatalog,
    pub ledger: &'a [ExistingCase],
    /// Current date in the intake time zone, computed at submission time.
    pub today: NaiveDate,
}

/// Terminal outcome of an intake attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "result", rename_all = "snake_case")]
pub enum IntakeDecision {
    Admitted(CaseDraft),
    Rejected(Vec<Violation>),
}

impl IntakeDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, IntakeDecision::Admitted(_))
    }

    pub fn draft(&self) -> Option<&CaseDraft> {
        match self {
            IntakeDecision::Admitted(draft) => Some(draft),
            IntakeDecision::Rejected(_) => None,
        }
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            IntakeDecision::Admitted(_) => &[],
            IntakeDecision::Rejected(violations) => violations,
        }
    }
}

/// Stateless decision function sequencing schema, pricing and eligibility.
#[derive(Debug, Clone)]
pub struct IntakeEngine {
    schema: SubmissionSchema,
    pricing: PricingResolver,
    eligibility: EligibilityChecker,
}

impl Default for IntakeEngine {
    fn default() -> Self {
        Self::new(&IntakePolicy::default())
    }
}

impl IntakeEngine {
    pub fn new(policy: &IntakePolicy) -> Self {
        Self {
            schema: SubmissionSchema::standard(policy),
            pricing: PricingResolver::from_policy(policy),
            eligibility: EligibilityChecker::standard(policy),
        }
    }

    pub fn decide(&self, request: IntakeRequest<'_>) -> IntakeDecision {
        match self.admit(request) {
            Ok(draft) => IntakeDecision::Admitted(draft),
            Err(violations) => IntakeDecision::Rejected(violations),
        }
    }

    /// Price preview for filing against a tenant, without a full submission.
    pub fn quote(
        &self,
        account: Option<&Account>,
        tenant_id: &TenantId,
        catalog: &dyn PropertyCatalog,
    ) -> Result<Quote, Violation> {
        let account = account.ok_or_else(unauthenticated)?;
        let tenant = catalog.tenant(tenant_id).ok_or_else(|| unknown_tenant(tenant_id))?;
        let property = catalog
            .property(&tenant.property_id)
            .ok_or_else(|| unknown_property(&tenant.property_id.0))?;
        self.pricing.resolve(account, &property.region)
    }

    /// Pricing finding for a submission that already failed the schema, when the tenant still
    /// resolves. Lets an unpriced or locked region surface alongside field errors.
    fn pricing_probe(&self, account: &Account, request: IntakeRequest<'_>) -> Option<Violation> {
        let raw = request.submission.tenant_id.as_deref()?.trim();
        let tenant = request.catalog.tenant(&TenantId(raw.to_string()))?;
        let property = request.catalog.property(&tenant.property_id)?;
        self.pricing.resolve(account, &property.region).err()
    }

    fn admit(&self, request: IntakeRequest<'_>) -> Result<CaseDraft, Vec<Violation>> {
        let account = request.account.ok_or_else(|| vec![unauthenticated()])?;

        let submission = self
            .schema
            .evaluate(request.submission, request.today)
            .map_err(|mut violations| {
                violations.extend(self.pricing_probe(account, request));
                violations
            })?;

        let tenant = request
            .catalog
            .tenant(&submission.tenant_id)
            .ok_or_else(|| vec![unknown_tenant(&submission.tenant_id)])?;
        let property = request
            .catalog
            .property(&tenant.property_id)
            .ok_or_else(|| vec![unknown_property(&tenant.property_id.0)])?;

        let quote = self
            .pricing
            .resolve(account, &property.region)
            .map_err(|violation| vec![violation])?;

        let subsidy_types = request.catalog.subsidy_types();
        let context = EligibilityContext {
            submission: &submission,
            tenant: &tenant,
            property: &property,
            ledger: request.ledger,
            subsidy_types: &subsidy_types,
        };
        self.eligibility
            .check(&context)
            .map_err(|violation| vec![violation])?;

        let document_required = document_required(&property, &tenant, &subsidy_types);
        let amount_owed = if submission.no_right_of_redemption {
            Money::ZERO
        } else {
            submission.amount_owed.unwrap_or(Money::ZERO)
        };

        Ok(CaseDraft {
            tenant_id: submission.tenant_id,
            property_id: property.id,
            region: property.region,
            amount_owed,
            price: quote.price,
            no_right_of_redemption: submission.no_right_of_redemption,
            court_case_number: submission.court_case_number,
            warrant_order_date: submission.warrant_order_date,
            scheduled_eviction_date: submission.scheduled_eviction_date,
            signer_name: submission.signer_name,
            supporting_document: submission.supporting_document,
            document_required,
            payment_status: PaymentStatus::Unpaid,
            status: CaseStatus::Draft,
        })
    }
}

pub(super) fn unauthenticated() -> Violation {
    Violation::domain(
        ViolationCode::Unauthenticated,
        "an authenticated account is required to submit a case",
    )
}

fn unknown_tenant(tenant_id: &TenantId) -> Violation {
    Violation::field(
        TENANT_ID,
        ViolationCode::UnknownTenant,
        format!("tenant {tenant_id} was not found in the property catalog"),
    )
}

fn unknown_property(property_id: &str) -> Violation {
    Violation::domain(
        ViolationCode::UnknownProperty,
        format!("property {property_id} was not found in the property catalog"),
    )
}
