use std::sync::Arc;

use super::common::*;
use crate::workflows::ftpr::domain::{
    AccountId, CaseId, CaseStatus, Money, PaymentStatus, TenantId,
};
use crate::workflows::ftpr::repository::{CaseRepository, RepositoryError};
use crate::workflows::ftpr::violation::ViolationCode;
use crate::workflows::ftpr::IntakeServiceError;

fn account_id() -> AccountId {
    AccountId(ACCOUNT.to_string())
}

#[test]
fn submit_stores_admitted_draft_under_generated_id() {
    let (service, cases) = build_service();

    let record = service
        .submit(Some(&account_id()), form())
        .expect("submission admitted");

    assert_eq!(record.case_id, CaseId("ftpr-000001".to_string()));
    assert_eq!(record.account_id, account_id());
    assert_eq!(record.draft.price(), Money::from_dollars(125));
    assert_eq!(cases.stored().len(), 1);

    let ledger = cases.ledger(&account_id()).expect("ledger readable");
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].status, CaseStatus::Draft);
    assert_eq!(ledger[0].payment_status, PaymentStatus::Unpaid);
}

#[test]
fn stored_drafts_do_not_block_further_attempts() {
    let (service, cases) = build_service();

    let first = service
        .submit(Some(&account_id()), form())
        .expect("first admitted");
    let second = service
        .submit(Some(&account_id()), form())
        .expect("drafts never count as duplicates");

    assert_ne!(first.case_id, second.case_id);
    assert_eq!(second.case_id, CaseId("ftpr-000002".to_string()));
    assert_eq!(cases.stored().len(), 2);
}

#[test]
fn submit_rejects_when_ledger_has_in_flight_case() {
    let cases = Arc::new(MemoryCases::with_prior(existing(
        "t-standard",
        PaymentStatus::Unpaid,
        CaseStatus::InReview,
    )));
    let service = service_with(cases.clone());

    match service.submit(Some(&account_id()), form()) {
        Err(IntakeServiceError::Rejected(violations)) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].code, ViolationCode::DuplicateRequest);
        }
        other => panic!("expected duplicate rejection, got {other:?}"),
    }
    assert!(cases.stored().is_empty(), "rejections are never stored");
}

#[test]
fn unknown_or_missing_account_is_unauthenticated() {
    let (service, cases) = build_service();

    let err = service.submit(None, form()).expect_err("no account");
    assert!(err.is_unauthenticated());

    let err = service
        .submit(Some(&AccountId("acct-unknown".to_string())), form())
        .expect_err("unknown account");
    assert!(err.is_unauthenticated());
    assert!(cases.stored().is_empty());
}

#[test]
fn field_rejections_are_not_unauthenticated() {
    let (service, _) = build_service();
    let mut form = form();
    form.signer_name = None;

    let err = service
        .submit(Some(&account_id()), form)
        .expect_err("missing signer");
    assert!(!err.is_unauthenticated());
    assert!(err.to_string().contains("1 violation"));
}

#[test]
fn repository_failures_propagate() {
    let service = service_with(Arc::new(UnavailableCases));

    match service.submit(Some(&account_id()), form()) {
        Err(IntakeServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline")
        }
        other => panic!("expected repository error, got {other:?}"),
    }
}

#[test]
fn get_returns_stored_record_or_not_found() {
    let (service, _) = build_service();
    let record = service
        .submit(Some(&account_id()), form())
        .expect("admitted");

    let fetched = service
        .get(Some(&account_id()), &record.case_id)
        .expect("record present");
    assert_eq!(fetched, record);

    match service.get(Some(&account_id()), &CaseId("ftpr-999999".to_string())) {
        Err(IntakeServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn get_hides_cases_from_other_and_anonymous_callers() {
    let (service, _) = build_service();
    let record = service
        .submit(Some(&account_id()), form())
        .expect("admitted");

    let foreign = AccountId(OTHER_ACCOUNT.to_string());
    match service.get(Some(&foreign), &record.case_id) {
        Err(IntakeServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found for a foreign account, got {other:?}"),
    }

    let err = service
        .get(None, &record.case_id)
        .expect_err("anonymous read");
    assert!(err.is_unauthenticated());

    let err = service
        .get(Some(&AccountId("acct-unknown".to_string())), &record.case_id)
        .expect_err("unknown account");
    assert!(err.is_unauthenticated());
}

#[test]
fn quote_uses_account_pricing() {
    let (service, _) = build_service();

    let quote = service
        .quote(Some(&account_id()), &TenantId("t-standard".to_string()))
        .expect("priced");
    assert_eq!(quote.price, Money::from_dollars(125));

    match service.quote(Some(&account_id()), &TenantId("t-campus".to_string())) {
        Err(IntakeServiceError::Rejected(violations)) => {
            assert_eq!(violations[0].code, ViolationCode::RegionLocked)
        }
        other => panic!("expected locked region, got {other:?}"),
    }
}

#[test]
fn status_view_reports_draft_summary() {
    let (service, _) = build_service();
    let mut form = form_for("t-section8");
    form.supporting_document = Some("hap-contract.pdf".to_string());

    let view = service
        .submit(Some(&account_id()), form)
        .expect("admitted")
        .status_view();

    assert_eq!(view.status, "draft");
    assert_eq!(view.payment_status, PaymentStatus::Unpaid);
    assert_eq!(view.amount_owed, Money::from_dollars(500));
    assert!(view.document_required);
}
