use super::common::*;
use crate::workflows::ftpr::catalog::PropertyCatalog;
use crate::workflows::ftpr::domain::{
    CaseStatus, ExistingCase, Money, PaymentStatus, PropertyId, SubsidyType, TenantId,
};
use crate::workflows::ftpr::eligibility::{
    document_required, months_owed, EligibilityChecker, EligibilityContext, EligibilityRule,
};
use crate::workflows::ftpr::schema::{SubmissionSchema, ValidatedSubmission};
use crate::workflows::ftpr::violation::{ViolationCode, ViolationKind};

fn validated(form: &crate::workflows::ftpr::SubmissionForm) -> ValidatedSubmission {
    SubmissionSchema::standard(&policy())
        .evaluate(form, today())
        .expect("fixture form is valid")
}

fn check(
    rule: EligibilityRule,
    submission: &ValidatedSubmission,
    ledger: &[ExistingCase],
) -> Result<(), crate::workflows::ftpr::Violation> {
    let catalog = catalog();
    let tenant = catalog
        .tenant(&submission.tenant_id)
        .expect("fixture tenant");
    let property = catalog
        .property(&tenant.property_id)
        .expect("fixture property");
    let subsidy_types = catalog.subsidy_types();
    rule.check(&EligibilityContext {
        submission,
        tenant: &tenant,
        property: &property,
        ledger,
        subsidy_types: &subsidy_types,
    })
}

#[test]
fn in_flight_unpaid_case_blocks_new_request() {
    let submission = validated(&form());
    let ledger = [existing(
        "t-standard",
        PaymentStatus::Unpaid,
        CaseStatus::InReview,
    )];

    let violation =
        check(EligibilityRule::DuplicateRequest, &submission, &ledger).expect_err("duplicate");
    assert_eq!(violation.code, ViolationCode::DuplicateRequest);
    assert_eq!(violation.kind(), ViolationKind::Eligibility);
    assert!(violation.field.is_none());
    assert!(violation.message.contains("in review"));
}

#[test]
fn drafts_paid_and_completed_cases_do_not_block() {
    let submission = validated(&form());
    let ledger = [
        existing("t-standard", PaymentStatus::Unpaid, CaseStatus::Draft),
        existing("t-standard", PaymentStatus::Unpaid, CaseStatus::Draft),
        existing("t-standard", PaymentStatus::Paid, CaseStatus::Filed),
        existing("t-standard", PaymentStatus::Unpaid, CaseStatus::Complete),
        existing("t-campus", PaymentStatus::Unpaid, CaseStatus::InReview),
    ];

    assert!(check(EligibilityRule::DuplicateRequest, &submission, &ledger).is_ok());
}

#[test]
fn redemption_cap_rejects_thirteen_months() {
    let mut form = form_for("t-section8");
    form.amount_owed = Some("13000".to_string());
    form.supporting_document = Some("hap-contract.pdf".to_string());
    let submission = validated(&form);

    let violation = check(
        EligibilityRule::RedemptionCap { max_months: 12 },
        &submission,
        &[],
    )
    .expect_err("13 months exceeds cap");
    assert_eq!(violation.code, ViolationCode::RedemptionCapExceeded);
    assert!(violation.message.contains("13 months"));
}

#[test]
fn redemption_cap_allows_twelve_months_and_rounds_partial_months_up() {
    let mut form = form_for("t-section8");
    form.amount_owed = Some("12000".to_string());
    let rule = EligibilityRule::RedemptionCap { max_months: 12 };
    assert!(check(rule.clone(), &validated(&form), &[]).is_ok());

    form.amount_owed = Some("12000.01".to_string());
    assert!(check(rule, &validated(&form), &[]).is_err());
}

#[test]
fn redemption_cap_ignores_unsubsidized_and_waived_cases() {
    let rule = EligibilityRule::RedemptionCap { max_months: 12 };

    let mut form = form();
    form.amount_owed = Some("50000".to_string());
    assert!(check(rule.clone(), &validated(&form), &[]).is_ok());

    let mut form = form_for("t-section8");
    form.no_right_of_redemption = true;
    form.amount_owed = Some("50000".to_string());
    assert!(check(rule, &validated(&form), &[]).is_ok());
}

#[test]
fn months_owed_guards_against_zero_rent() {
    assert_eq!(
        months_owed(Money::from_dollars(13_000), Money::from_dollars(1_000)),
        Some(13)
    );
    assert_eq!(
        months_owed(Money::from_dollars(1), Money::from_dollars(1_000)),
        Some(1)
    );
    assert_eq!(months_owed(Money::from_dollars(500), Money::ZERO), None);
}

#[test]
fn default_subsidy_type_needs_no_document() {
    let catalog = catalog();
    let tenant = catalog
        .tenant(&TenantId("t-default-subsidy".to_string()))
        .expect("tenant");
    let property = catalog.property(&tenant.property_id).expect("property");

    assert!(tenant.subsidized);
    assert!(!document_required(
        &property,
        &tenant,
        &catalog.subsidy_types()
    ));
}

#[test]
fn special_subsidy_on_residential_requires_document() {
    let catalog = catalog();
    let tenant = catalog
        .tenant(&TenantId("t-section8".to_string()))
        .expect("tenant");
    let residential = catalog.property(&tenant.property_id).expect("property");
    let commercial = catalog
        .property(&PropertyId("p-plaza".to_string()))
        .expect("property");

    assert!(document_required(
        &residential,
        &tenant,
        &catalog.subsidy_types()
    ));
    assert!(!document_required(
        &commercial,
        &tenant,
        &catalog.subsidy_types()
    ));
    assert!(document_required(&residential, &tenant, &[]));
    assert!(!document_required(
        &residential,
        &tenant,
        &[SubsidyType::new("section8")]
    ));
}

#[test]
fn missing_document_fails_when_required() {
    let submission = validated(&form_for("t-section8"));
    let violation = check(EligibilityRule::SupportingDocument, &submission, &[])
        .expect_err("document required");
    assert_eq!(violation.code, ViolationCode::DocumentRequired);

    let mut form = form_for("t-section8");
    form.supporting_document = Some("hap-contract.pdf".to_string());
    assert!(check(EligibilityRule::SupportingDocument, &validated(&form), &[]).is_ok());
}

#[test]
fn checker_reports_first_failing_gate() {
    let mut form = form_for("t-section8");
    form.amount_owed = Some("13000".to_string());
    let submission = validated(&form);
    let ledger = [existing(
        "t-section8",
        PaymentStatus::Unpaid,
        CaseStatus::NoticeIssued,
    )];

    let catalog = catalog();
    let tenant = catalog.tenant(&submission.tenant_id).expect("tenant");
    let property = catalog.property(&tenant.property_id).expect("property");
    let subsidy_types = catalog.subsidy_types();
    let context = EligibilityContext {
        submission: &submission,
        tenant: &tenant,
        property: &property,
        ledger: &ledger,
        subsidy_types: &subsidy_types,
    };

    let checker = EligibilityChecker::standard(&policy());
    assert_eq!(checker.rules().len(), 3);
    let violation = checker.check(&context).expect_err("all three gates fail");
    assert_eq!(violation.code, ViolationCode::DuplicateRequest);

    let reordered = EligibilityChecker::new(vec![
        EligibilityRule::SupportingDocument,
        EligibilityRule::DuplicateRequest,
    ]);
    let violation = reordered.check(&context).expect_err("document gate first");
    assert_eq!(violation.code, ViolationCode::DocumentRequired);
}

#[test]
fn months_owed_rounds_up_without_overflowing_large_rents() {
    assert_eq!(
        months_owed(Money::from_dollars(13_000), Money::from_cents(i64::MAX)),
        Some(1)
    );
    assert_eq!(
        months_owed(Money::from_cents(i64::MAX), Money::from_cents(i64::MAX)),
        Some(1)
    );
    assert_eq!(months_owed(Money::ZERO, Money::from_dollars(1_000)), Some(0));
    assert_eq!(
        months_owed(Money::from_dollars(1_001), Money::from_dollars(1_000)),
        Some(2)
    );
}

#[test]
fn redemption_cap_passes_for_tenant_with_enormous_rent() {
    let catalog = catalog();
    let mut tenant = catalog
        .tenant(&TenantId("t-section8".to_string()))
        .expect("fixture tenant");
    tenant.monthly_rent = Some(Money::from_cents(i64::MAX));
    let property = catalog
        .property(&tenant.property_id)
        .expect("fixture property");
    let mut form = form_for("t-section8");
    form.amount_owed = Some("13000".to_string());
    let submission = validated(&form);
    let subsidy_types = catalog.subsidy_types();
    let context = EligibilityContext {
        submission: &submission,
        tenant: &tenant,
        property: &property,
        ledger: &[],
        subsidy_types: &subsidy_types,
    };

    assert_eq!(
        EligibilityRule::RedemptionCap { max_months: 12 }.check(&context),
        Ok(())
    );
}
